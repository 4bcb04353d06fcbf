//! Areas, zones, owners and the other grouping and table records.

use std::fmt;

record! {
    /// Area with interchange scheduling data.
    Area {
        i: i64,
        /// Area slack bus, 0 to use the system slack
        isw: i64 = 0,
        /// Desired net export in MW
        pdes: f64 = 0.0,
        ptol: f64 = 10.0,
        arname: String = "",
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Area {:>3} {:<20} Slack={:>4}  Pdes={:>8.1} MW  Ptol={:.1} MW",
            self.i, self.arname, self.isw, self.pdes, self.ptol
        )
    }
}

record! {
    Zone {
        i: i64,
        zoname: String,
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zone {:>3} {}", self.i, self.zoname)
    }
}

record! {
    Owner {
        i: i64,
        owname: String,
    }
}

record! {
    /// Scheduled transfer between two areas.
    InterareaTransfer {
        arfrom: i64,
        arto: i64,
        trid: String,
        ptran: f64,
    }
}

record! {
    /// Impedance correction table: up to eleven (Ti, Fi) points.
    ImpedanceCorrection {
        i: i64,
        t1: f64 = 0.0,
        f1: f64 = 0.0,
        t2: f64 = 0.0,
        f2: f64 = 0.0,
        t3: f64 = 0.0,
        f3: f64 = 0.0,
        t4: f64 = 0.0,
        f4: f64 = 0.0,
        t5: f64 = 0.0,
        f5: f64 = 0.0,
        t6: f64 = 0.0,
        f6: f64 = 0.0,
        t7: f64 = 0.0,
        f7: f64 = 0.0,
        t8: f64 = 0.0,
        f8: f64 = 0.0,
        t9: f64 = 0.0,
        f9: f64 = 0.0,
        t10: f64 = 0.0,
        f10: f64 = 0.0,
        t11: f64 = 0.0,
        f11: f64 = 0.0,
    }
}

impl ImpedanceCorrection {
    /// Table points up to the first all-zero pair.
    pub fn points(&self) -> Vec<(f64, f64)> {
        [
            (self.t1, self.f1),
            (self.t2, self.f2),
            (self.t3, self.f3),
            (self.t4, self.f4),
            (self.t5, self.f5),
            (self.t6, self.f6),
            (self.t7, self.f7),
            (self.t8, self.f8),
            (self.t9, self.f9),
            (self.t10, self.f10),
            (self.t11, self.f11),
        ]
        .into_iter()
        .take_while(|&(t, f)| t != 0.0 || f != 0.0)
        .collect()
    }
}

record! {
    MultiSectionLineGrouping {
        i: i64,
        j: i64,
        id: String,
        met: i64,
        dum1: i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(line: &str) -> Vec<String> {
        line.split(',').map(String::from).collect()
    }

    #[test]
    fn area_with_only_number() {
        let area = Area::decode(0, &fields("7")).unwrap();
        assert_eq!((area.i, area.isw, area.pdes, area.ptol), (7, 0, 0.0, 10.0));
        assert_eq!(area.arname, "");
        assert_eq!(area, Area::decode(0, &fields("7,0,0.0,10.0,''")).unwrap());
    }

    #[test]
    fn impedance_correction_points() {
        let table =
            ImpedanceCorrection::decode(0, &fields("1,-30.0,1.1,0.0,1.0,30.0,1.1")).unwrap();
        assert_eq!(table.points(), vec![(-30.0, 1.1), (0.0, 1.0), (30.0, 1.1)]);
        assert_eq!(table.f11, 0.0);
    }

    #[test]
    fn multi_section_line_id_keeps_ampersand() {
        let grouping = MultiSectionLineGrouping::decode(0, &fields("1,2,'&1',1,3")).unwrap();
        assert_eq!(grouping.id, "&1");
        assert_eq!(grouping.dum1, 3);
    }

    #[test]
    fn zone_display() {
        let zone = Zone::decode(0, &fields("4,'EAST'")).unwrap();
        assert_eq!(zone.to_string(), "Zone   4 EAST");
    }
}
