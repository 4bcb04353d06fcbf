//! DC line records: two-terminal, VSC and multi-terminal.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::table::{FieldValue, Tabular, prefixed};

record! {
    TwoTerminalDcParameters {
        name: String,
        mdc: i64,
        rdc: f64,
        setvl: f64,
        vschd: f64,
        vcmod: f64,
        rcomp: f64,
        delti: f64,
        /// 'R' or 'I': end at which power is metered
        meter: String,
        dcvmin: f64,
        cccitmx: i64,
        cccacc: f64,
    }
}

record! {
    /// Rectifier or inverter line of a two-terminal DC line.
    TwoTerminalDcConverter {
        ip: i64,
        nb: i64,
        anmx: f64,
        anmn: f64,
        rc: f64,
        xc: f64,
        ebas: f64,
        tr: f64,
        tap: f64,
        tmx: f64,
        tmn: f64,
        stp: f64,
        ic: i64,
        /// Branch whose current is used for commutation (from, to, circuit)
        ifrom: i64,
        ito: i64,
        id: String,
        xcap: f64,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoTerminalDcLine {
    pub index: usize,
    pub parameters: TwoTerminalDcParameters,
    pub rectifier: TwoTerminalDcConverter,
    pub inverter: TwoTerminalDcConverter,
}

impl Tabular for TwoTerminalDcLine {
    fn columns() -> Vec<String> {
        std::iter::once("index".to_string())
            .chain(prefixed("", TwoTerminalDcParameters::FIELDS))
            .chain(prefixed("rectifier_", TwoTerminalDcConverter::FIELDS))
            .chain(prefixed("inverter_", TwoTerminalDcConverter::FIELDS))
            .collect()
    }

    fn row(&self) -> Vec<FieldValue> {
        let mut row = vec![FieldValue::from(self.index)];
        row.extend(self.parameters.values());
        row.extend(self.rectifier.values());
        row.extend(self.inverter.values());
        row
    }
}

record! {
    VscDcParameters {
        name: String,
        mdc: i64,
        rdc: f64,
        o1: i64 = 0,
        f1: f64 = 1.0,
        o2: i64 = 0,
        f2: f64 = 1.0,
        o3: i64 = 0,
        f3: f64 = 1.0,
        o4: i64 = 0,
        f4: f64 = 1.0,
    }
}

record! {
    VscDcConverter {
        ibus: i64,
        /// TYPE: DC control type
        control_type: i64,
        mode: i64,
        dcset: f64,
        acset: f64,
        aloss: f64,
        bloss: f64,
        minloss: f64,
        smax: f64,
        imax: f64,
        pwf: f64,
        maxq: f64,
        minq: f64,
        remot: i64 = 0,
        rmpct: f64 = 100.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VscDcLine {
    pub index: usize,
    pub parameters: VscDcParameters,
    pub converter_1: VscDcConverter,
    pub converter_2: VscDcConverter,
}

impl Tabular for VscDcLine {
    fn columns() -> Vec<String> {
        std::iter::once("index".to_string())
            .chain(prefixed("", VscDcParameters::FIELDS))
            .chain(prefixed("converter1_", VscDcConverter::FIELDS))
            .chain(prefixed("converter2_", VscDcConverter::FIELDS))
            .collect()
    }

    fn row(&self) -> Vec<FieldValue> {
        let mut row = vec![FieldValue::from(self.index)];
        row.extend(self.parameters.values());
        row.extend(self.converter_1.values());
        row.extend(self.converter_2.values());
        row
    }
}

record! {
    /// Header of a multi-terminal DC line, declaring its sub-record counts.
    MultiTerminalDcParameters {
        name: String,
        nconv: i64,
        ndcbs: i64,
        ndcln: i64,
        mdc: i64,
        vconv: i64,
        vcmod: f64,
        vconvn: i64,
    }
}

/// Sub-record counts of a multi-terminal DC line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiTerminalDcCounts {
    pub converters: usize,
    pub dc_buses: usize,
    pub dc_links: usize,
}

impl MultiTerminalDcCounts {
    /// Physical lines of the whole record, header included.
    pub fn line_count(&self) -> usize {
        1 + self.converters + self.dc_buses + self.dc_links
    }
}

impl MultiTerminalDcParameters {
    /// Declared counts; a negative count is rejected.
    pub fn counts(&self) -> Result<MultiTerminalDcCounts, FieldError> {
        Ok(MultiTerminalDcCounts {
            converters: count("nconv", self.nconv)?,
            dc_buses: count("ndcbs", self.ndcbs)?,
            dc_links: count("ndcln", self.ndcln)?,
        })
    }
}

fn count(field: &'static str, value: i64) -> Result<usize, FieldError> {
    usize::try_from(value).map_err(|_| FieldError::Invalid {
        field,
        value: value.to_string(),
        expected: "non-negative count",
    })
}

record! {
    MultiTerminalDcConverter {
        ib: i64,
        n: i64,
        angmx: f64,
        angmn: f64,
        rc: f64,
        xc: f64,
        ebas: f64,
        tr: f64,
        tap: f64,
        tpmx: f64,
        tpmn: f64,
        tstp: f64,
        setvl: f64,
        dcpf: f64,
        marg: f64,
        cnvcod: i64,
    }
}

record! {
    MultiTerminalDcBus {
        idc: i64,
        ib: i64,
        area: i64,
        zone: i64,
        dcname: String,
        idc2: i64,
        rgrnd: f64,
        owner: i64,
    }
}

record! {
    MultiTerminalDcLink {
        idc: i64,
        jdc: i64,
        dcckt: String,
        met: i64,
        rdc: f64,
        ldc: f64,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiTerminalDcLine {
    pub index: usize,
    pub parameters: MultiTerminalDcParameters,
    pub converters: Vec<MultiTerminalDcConverter>,
    pub dc_buses: Vec<MultiTerminalDcBus>,
    pub dc_links: Vec<MultiTerminalDcLink>,
}

impl MultiTerminalDcLine {
    /// Build the composite, checking each sub-collection against the header counts.
    pub fn assemble(
        index: usize,
        parameters: MultiTerminalDcParameters,
        converters: Vec<MultiTerminalDcConverter>,
        dc_buses: Vec<MultiTerminalDcBus>,
        dc_links: Vec<MultiTerminalDcLink>,
    ) -> Result<Self, FieldError> {
        let counts = parameters.counts()?;
        for (field, declared, found) in [
            ("nconv", counts.converters, converters.len()),
            ("ndcbs", counts.dc_buses, dc_buses.len()),
            ("ndcln", counts.dc_links, dc_links.len()),
        ] {
            if declared != found {
                return Err(FieldError::Invalid {
                    field,
                    value: declared.to_string(),
                    expected: "count matching the sub-records given",
                });
            }
        }
        Ok(Self {
            index,
            parameters,
            converters,
            dc_buses,
            dc_links,
        })
    }

    pub fn line_count(&self) -> usize {
        1 + self.converters.len() + self.dc_buses.len() + self.dc_links.len()
    }
}

impl Tabular for MultiTerminalDcLine {
    fn columns() -> Vec<String> {
        std::iter::once("index".to_string())
            .chain(prefixed("", MultiTerminalDcParameters::FIELDS))
            .collect()
    }

    fn row(&self) -> Vec<FieldValue> {
        let mut row = vec![FieldValue::from(self.index)];
        row.extend(self.parameters.values());
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(line: &str) -> Vec<String> {
        line.split(',').map(String::from).collect()
    }

    fn parameters(header: &str) -> MultiTerminalDcParameters {
        MultiTerminalDcParameters::decode(0, &fields(header)).unwrap()
    }

    #[test]
    fn counts_from_header() {
        let counts = parameters("'MTDC1',2,3,1,1,1,500.0,1").counts().unwrap();
        assert_eq!(
            counts,
            MultiTerminalDcCounts {
                converters: 2,
                dc_buses: 3,
                dc_links: 1,
            }
        );
        assert_eq!(counts.line_count(), 7);
    }

    #[test]
    fn negative_count_is_rejected() {
        let err = parameters("'MTDC1',-1,0,0,1,1,500.0,1").counts().unwrap_err();
        assert!(matches!(err, FieldError::Invalid { field: "nconv", .. }));
    }

    #[test]
    fn assemble_checks_counts() {
        let link = MultiTerminalDcLink::decode(0, &fields("1,2,'1',0,5.0,0.0")).unwrap();
        let line = MultiTerminalDcLine::assemble(
            0,
            parameters("'MTDC1',0,0,1,1,1,500.0,1"),
            vec![],
            vec![],
            vec![link.clone()],
        )
        .unwrap();
        assert_eq!(line.line_count(), 2);

        let err = MultiTerminalDcLine::assemble(
            0,
            parameters("'MTDC1',0,0,2,1,1,500.0,1"),
            vec![],
            vec![],
            vec![link],
        )
        .unwrap_err();
        assert!(matches!(err, FieldError::Invalid { field: "ndcln", .. }));
    }

    #[test]
    fn vsc_converter_defaults() {
        let line = "1,1,1,100.0,1.0,0.0,0.0,0.0,200.0,1000.0,1.0,100.0,-100.0";
        let converter = VscDcConverter::decode(0, &fields(line)).unwrap();
        assert_eq!(converter.remot, 0);
        assert_eq!(converter.rmpct, 100.0);
        let parameters = VscDcParameters::decode(0, &fields("'VSC1',1,0.5")).unwrap();
        assert_eq!((parameters.o4, parameters.f4), (0, 1.0));
    }
}
