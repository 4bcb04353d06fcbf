use std::fmt;

use serde::{Deserialize, Serialize};

/// Bus type code (IDE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusType {
    PQ,    // load bus
    PV,    // generator bus
    Slack, // swing bus
    OOS,   // out of service
}

impl BusType {
    pub fn from_code(ide: i64) -> Option<Self> {
        match ide {
            1 => Some(BusType::PQ),
            2 => Some(BusType::PV),
            3 => Some(BusType::Slack),
            4 => Some(BusType::OOS),
            _ => None,
        }
    }
}

impl fmt::Display for BusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusType::Slack => write!(f, "REF"),
            BusType::PQ => write!(f, "P-Q"),
            BusType::PV => write!(f, "P-V"),
            BusType::OOS => write!(f, "OOS"),
        }
    }
}

record! {
    /// Bus data record.
    Bus {
        /// Bus number
        i: i64,
        name: String,
        /// Base voltage in kV
        baskv: f64,
        ide: i64,
        area: i64,
        zone: i64,
        owner: i64,
        vm: f64,
        va: f64,
        // Normal and emergency voltage limits
        nvhi: f64 = 1.1,
        nvlo: f64 = 0.9,
        evhi: f64 = 1.1,
        evlo: f64 = 0.9,
    }
}

impl Bus {
    /// `None` for codes outside 1..=4.
    pub fn bus_type(&self) -> Option<BusType> {
        BusType::from_code(self.ide)
    }

    pub fn in_service(&self) -> bool {
        self.ide != 4
    }
}

impl fmt::Display for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bus_type = self
            .bus_type()
            .map(|t| t.to_string())
            .unwrap_or_else(|| format!("?{}", self.ide));
        write!(
            f,
            "Bus {:>3} {:<14} {:>5} {:>8.2} kV  |V|={:.6}  Angle={:>9.6}",
            self.i, self.name, bus_type, self.baskv, self.vm, self.va
        )
    }
}

record! {
    /// Load data record.
    Load {
        i: i64,
        id: String,
        status: i64,
        area: i64,
        zone: i64,
        // Constant power, current and admittance components
        pl: f64,
        ql: f64,
        ip: f64,
        iq: f64,
        yp: f64,
        yq: f64,
        owner: i64,
        scale: i64,
        intrpt: i64 = 0,
    }
}

impl fmt::Display for Load {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Load {:>3} Bus {:>3} ID {:<4} P={:>9.3} MW  Q={:>9.3} MVAR",
            self.index, self.i, self.id, self.pl, self.ql
        )
    }
}

record! {
    /// Fixed shunt at a bus.
    /// GL and BL are in MW and MVAR at 1.0 pu voltage.
    FixedShunt {
        i: i64,
        id: String,
        status: i64,
        gl: f64,
        bl: f64,
    }
}

impl fmt::Display for FixedShunt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FixedShunt Bus {:>3} ID {:<4} GL={:>8.3} MW  BL={:>8.3} MVAR",
            self.i, self.id, self.gl, self.bl
        )
    }
}

record! {
    /// Generator data record.
    Generator {
        i: i64,
        id: String,
        pg: f64,
        qg: f64,
        /// Reactive limits
        qt: f64,
        qb: f64,
        /// Voltage setpoint
        vs: f64,
        ireg: i64,
        mbase: f64,
        zr: f64,
        zx: f64,
        rt: f64,
        xt: f64,
        gtap: f64,
        stat: i64,
        rmpct: f64,
        /// Active limits
        pt: f64,
        pb: f64,
        o1: i64,
        f1: f64,
        o2: i64 = 0,
        f2: f64 = 1.0,
        o3: i64 = 0,
        f3: f64 = 1.0,
        o4: i64 = 0,
        f4: f64 = 1.0,
        wmod: i64 = 0,
        wpf: f64 = 1.0,
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Gen {:>3} Bus {:>3} ID {:<4} P={:>9.3} MW  Q={:>9.3} MVAR  Vset={:.5}",
            self.index, self.i, self.id, self.pg, self.qg, self.vs
        )
    }
}

record! {
    /// Non-transformer AC branch.
    Branch {
        i: i64,
        j: i64,
        ckt: String,
        r: f64,
        x: f64,
        b: f64,
        ratea: f64,
        rateb: f64,
        ratec: f64,
        gi: f64,
        bi: f64,
        gj: f64,
        bj: f64,
        st: i64,
        met: i64,
        len: f64,
        o1: i64,
        f1: f64,
        o2: i64 = 0,
        f2: f64 = 1.0,
        o3: i64 = 0,
        f3: f64 = 1.0,
        o4: i64 = 0,
        f4: f64 = 1.0,
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Branch {:>3} {:>3} -> {:<3} CKT {:<3} R={:>10.6}  X={:>10.6}  RateA={:>7.1} RateB={:>7.1}",
            self.index, self.i, self.j, self.ckt, self.r, self.x, self.ratea, self.rateb
        )
    }
}

record! {
    FactsDevice {
        name: String,
        /// Sending and terminal bus (0 for a shunt device)
        i: i64,
        j: i64,
        mode: i64,
        pdes: f64,
        qdes: f64,
        vset: f64,
        shmx: f64,
        trmx: f64,
        vtmn: f64,
        vtmx: f64,
        vsmx: f64,
        imx: f64,
        linx: f64,
        rmpct: f64,
        owner: i64,
        set1: f64,
        set2: f64,
        vsref: i64,
        remot: i64 = 0,
        mname: String = "",
    }
}

record! {
    /// Switched shunt (capacitor/reactor banks) at a bus.
    SwitchedShunt {
        i: i64,
        modsw: i64,
        adjm: i64,
        stat: i64,
        vswhi: f64,
        vswlo: f64,
        swrem: i64,
        rmpct: f64,
        rmidnt: String,
        binit: f64,
        // (Ni, Bi) block pairs, only the first is mandatory
        n1: i64,
        b1: f64,
        n2: i64 = 0,
        b2: f64 = 0.0,
        n3: i64 = 0,
        b3: f64 = 0.0,
        n4: i64 = 0,
        b4: f64 = 0.0,
        n5: i64 = 0,
        b5: f64 = 0.0,
        n6: i64 = 0,
        b6: f64 = 0.0,
        n7: i64 = 0,
        b7: f64 = 0.0,
        n8: i64 = 0,
        b8: f64 = 0.0,
    }
}

impl SwitchedShunt {
    /// Non-empty (steps, MVAR per step) blocks in file order.
    pub fn blocks(&self) -> Vec<(i64, f64)> {
        [
            (self.n1, self.b1),
            (self.n2, self.b2),
            (self.n3, self.b3),
            (self.n4, self.b4),
            (self.n5, self.b5),
            (self.n6, self.b6),
            (self.n7, self.b7),
            (self.n8, self.b8),
        ]
        .into_iter()
        .filter(|(n, _)| *n != 0)
        .collect()
    }

    /// Capacitive MVAR available with every positive block switched in.
    pub fn b_max(&self) -> f64 {
        self.blocks()
            .iter()
            .map(|(n, b)| if *b > 0.0 { *n as f64 * b } else { 0.0 })
            .sum()
    }

    /// Inductive MVAR available with every negative block switched in.
    pub fn b_min(&self) -> f64 {
        self.blocks()
            .iter()
            .map(|(n, b)| if *b < 0.0 { *n as f64 * b } else { 0.0 })
            .sum()
    }
}

impl fmt::Display for SwitchedShunt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SwitchedShunt Bus {:>3}  Binit={:>8.3} MVAR  Vlo={:.4}  Vhi={:.4}  Blocks={}",
            self.i,
            self.binit,
            self.vswlo,
            self.vswhi,
            self.blocks().len()
        )
    }
}

record! {
    /// Induction machine data record.
    InductionMachine {
        i: i64,
        id: String,
        stat: i64,
        scode: i64,
        dcode: i64,
        area: i64,
        zone: i64,
        owner: i64,
        tcode: i64,
        bcode: i64,
        mbase: f64,
        ratekv: f64,
        pcode: i64,
        pset: f64,
        h: f64,
        a: f64,
        b: f64,
        d: f64,
        e: f64,
        ra: f64,
        xa: f64,
        xm: f64,
        r1: f64,
        x1: f64,
        r2: f64,
        x2: f64,
        x3: f64,
        e1: f64,
        se1: f64,
        e2: f64,
        se2: f64,
        ia1: f64,
        ia2: f64,
        xamult: f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Tabular;

    fn fields(line: &str) -> Vec<String> {
        line.split(',').map(String::from).collect()
    }

    #[test]
    fn bus_minimum_fields_take_documented_defaults() {
        let short = Bus::decode(0, &fields("1,'BUS1',138.0,1,1,1,1,1.0,0.0")).unwrap();
        let padded =
            Bus::decode(0, &fields("1,'BUS1',138.0,1,1,1,1,1.0,0.0,1.1,0.9,1.1,0.9")).unwrap();
        assert_eq!(short, padded);
        assert_eq!(short.i, 1);
        assert_eq!(short.name, "BUS1");
        assert_eq!(short.bus_type(), Some(BusType::PQ));
    }

    #[test]
    fn bus_missing_required_field() {
        let err = Bus::decode(0, &fields("1,'BUS1',138.0,1,1,1,1,1.0")).unwrap_err();
        assert_eq!(err, crate::error::FieldError::Missing { field: "va" });
    }

    #[test]
    fn generator_optional_owners_and_wind_fields() {
        let line = "10,'G1',100.0,20.0,50.0,-50.0,1.02,0,150.0,0.0,1.0,0.0,0.0,1.0,1,100.0,120.0,10.0,1,1.0";
        let generator = Generator::decode(3, &fields(line)).unwrap();
        assert_eq!(generator.index, 3);
        assert_eq!(generator.i, 10);
        assert_eq!((generator.o2, generator.f2), (0, 1.0));
        assert_eq!((generator.wmod, generator.wpf), (0, 1.0));
        assert_eq!(generator.pt, 120.0);
    }

    #[test]
    fn switched_shunt_blocks() {
        let line = "5,1,0,1,1.05,0.95,0,100.0,'',0.0,2,10.0,1,-15.0";
        let shunt = SwitchedShunt::decode(0, &fields(line)).unwrap();
        assert_eq!(shunt.rmidnt, "");
        assert_eq!(shunt.blocks(), vec![(2, 10.0), (1, -15.0)]);
        assert_eq!(shunt.b_max(), 20.0);
        assert_eq!(shunt.b_min(), -15.0);
        assert_eq!((shunt.n8, shunt.b8), (0, 0.0));
    }

    #[test]
    fn facts_optional_monitor_name() {
        let line = "'F1',1,0,1,0.0,0.0,1.0,9999.0,9999.0,0.9,1.1,1.0,0.0,0.05,100.0,1,0.0,0.0,0";
        let facts = FactsDevice::decode(0, &fields(line)).unwrap();
        assert_eq!(facts.name, "F1");
        assert_eq!(facts.remot, 0);
        assert_eq!(facts.mname, "");
    }

    #[test]
    fn tabular_row_matches_columns() {
        let load = Load::decode(2, &fields("1,'1 ',1,1,1,10.0,5.0,0.0,0.0,0.0,0.0,1,1")).unwrap();
        let columns = Load::columns();
        let row = load.row();
        assert_eq!(columns.len(), row.len());
        assert_eq!(columns[0], "index");
        assert_eq!(columns[1], "i");
        assert_eq!(columns.last().map(String::as_str), Some("intrpt"));
    }

    #[test]
    fn display_formats() {
        let bus = Bus::decode(0, &fields("7,'NORTH',230.0,3,1,1,1,1.02,-4.5")).unwrap();
        let text = bus.to_string();
        assert!(text.contains("NORTH"));
        assert!(text.contains("REF"));
    }
}
