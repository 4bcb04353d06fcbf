//! Builders for RAW case text used across the integration tests.

#![allow(dead_code)]

use pssraw::Section;

pub const HEADER: &str = "0, 100.00, 33, 0, 1, 60.00 / TEST CASE";

pub const BUS: &str = "1,'BUS1',138.0,3,1,1,1,1.02,0.0";
pub const LOAD: &str = "1,'1 ',1,1,1,50.0,10.0,0.0,0.0,0.0,0.0,1,1";
pub const FIXED_SHUNT: &str = "2,'1 ',1,0.0,25.0";
pub const GENERATOR: &str =
    "1,'1 ',100.0,20.0,50.0,-50.0,1.02,0,200.0,0.0,0.2,0.0,0.0,1.0,1,100.0,150.0,0.0,1,1.0";
pub const BRANCH: &str =
    "1,2,'1 ',0.01,0.1,0.02,100.0,110.0,120.0,0.0,0.0,0.0,0.0,1,1,10.0,1,1.0";
pub const AREA: &str = "1,1,0.0,10.0,'AREA1'";
pub const ZONE: &str = "1,'ZONE1'";
pub const OWNER: &str = "1,'OWNER1'";
pub const TRANSFER: &str = "1,2,'A',50.0";
pub const IMPEDANCE_CORRECTION: &str = "1,-30.0,1.1,0.0,1.0,30.0,1.1";
pub const MULTI_SECTION_LINE: &str = "1,2,'&1',1,3";
pub const FACTS: &str = "'F1',1,0,1,0.0,0.0,1.0,100.0,100.0,0.9,1.1,1.0,0.0,0.05,100.0,1,0.0,0.0,0";
pub const SWITCHED_SHUNT: &str = "2,1,0,1,1.05,0.95,0,100.0,'',20.0,2,10.0";
pub const INDUCTION_MACHINE: &str = "1,'M1',1,1,1,1,1,1,1,1,100.0,13.8,1,50.0,1.0,0.0,0.0,0.0,1.0,\
0.0,0.1,3.0,0.01,0.1,0.01,0.1,0.0,1.0,0.0,1.2,0.0,0.0,0.0,1.0";

pub const WINDING: &str = "1.0,0.0,0.0,100.0,110.0,120.0,0,0,1.1,0.9,1.1,0.9,33,0,0.0,0.0";

/// Four lines of a two-winding transformer between buses 1 and 2.
pub fn two_winding(name: &str) -> Vec<String> {
    vec![
        format!("1,2,0,'1 ',1,1,1,0.0,0.0,2,'{name}',1,1,1.0,0,1.0,0,1.0,0,1.0"),
        "0.001,0.05,100.0".to_string(),
        WINDING.to_string(),
        "1.0,0.0".to_string(),
    ]
}

/// Five lines of a three-winding transformer between buses 1, 2 and 3.
pub fn three_winding(name: &str) -> Vec<String> {
    vec![
        format!("1,2,3,'1 ',1,1,1,0.0,0.0,2,'{name}',1,1,1.0,0,1.0,0,1.0,0,1.0"),
        "0.001,0.05,100.0,0.001,0.05,100.0,0.001,0.05,100.0,1.0,0.0".to_string(),
        format!("{WINDING},0.0"),
        format!("{WINDING},0.0"),
        format!("{WINDING},0.0"),
    ]
}

pub fn two_terminal_dc() -> Vec<String> {
    let converter = "1,2,20.0,5.0,0.0,10.0,230.0,1.0,1.0,1.1,0.9,0.00625,0,0,0,'1',0.0";
    vec![
        "'DC1',1,5.0,100.0,500.0,0.0,0.0,0.0,'I',0.0,20,1.0".to_string(),
        converter.to_string(),
        converter.replacen("1,2,", "2,2,", 1),
    ]
}

pub fn vsc_dc() -> Vec<String> {
    let converter = "1,1,1,100.0,1.0,0.0,0.0,0.0,200.0,1000.0,1.0,100.0,-100.0";
    vec![
        "'VSC1',1,0.5".to_string(),
        converter.to_string(),
        format!("{},0,100.0", converter.replacen("1,1,1,", "2,2,1,", 1)),
    ]
}

/// A multi-terminal DC line with the given numbers of converters, DC buses and DC links.
pub fn multi_terminal_dc(converters: usize, dc_buses: usize, dc_links: usize) -> Vec<String> {
    let mut lines = vec![format!("'MTDC1',{converters},{dc_buses},{dc_links},1,1,500.0,1")];
    for i in 1..=converters {
        lines.push(format!(
            "{i},2,20.0,5.0,0.0,10.0,230.0,1.0,1.0,1.1,0.9,0.00625,100.0,1.0,0.0,1"
        ));
    }
    for i in 1..=dc_buses {
        lines.push(format!("{i},{i},1,1,'DCB{i}',0,0.0,1"));
    }
    for i in 1..=dc_links {
        lines.push(format!("{i},{},'1',0,5.0,0.0", i + 1));
    }
    lines
}

/// Text of a RAW case assembled section by section.
#[derive(Debug, Clone)]
pub struct RawCase {
    header: String,
    sections: Vec<Vec<String>>,
}

impl Default for RawCase {
    fn default() -> Self {
        Self {
            header: HEADER.to_string(),
            sections: vec![Vec::new(); Section::DATA_SECTIONS.len()],
        }
    }
}

impl RawCase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, header: &str) -> Self {
        self.header = header.to_string();
        self
    }

    pub fn with<S: AsRef<str>>(mut self, section: Section, lines: &[S]) -> Self {
        let slot = slot(section);
        self.sections[slot].extend(lines.iter().map(|l| l.as_ref().to_string()));
        self
    }

    /// Header, identification records, every section with its terminator, then `Q`.
    pub fn build(&self) -> String {
        let mut lines = self.preamble();
        for (section, records) in Section::DATA_SECTIONS.iter().zip(&self.sections) {
            lines.extend(records.iter().cloned());
            lines.push(terminator(*section));
        }
        lines.push("Q".to_string());
        lines.join("\n")
    }

    /// Like [`RawCase::build`] but the text stops right after the records
    /// of `last`, before its terminator.
    pub fn build_through(&self, last: Section) -> String {
        let mut lines = self.preamble();
        for (section, records) in Section::DATA_SECTIONS.iter().zip(&self.sections) {
            lines.extend(records.iter().cloned());
            if *section == last {
                break;
            }
            lines.push(terminator(*section));
        }
        lines.join("\n")
    }

    fn preamble(&self) -> Vec<String> {
        vec![
            self.header.clone(),
            "PSS(R)E TEST CASE".to_string(),
            "GENERATED FOR PARSER TESTS".to_string(),
        ]
    }
}

fn slot(section: Section) -> usize {
    Section::DATA_SECTIONS
        .iter()
        .position(|s| *s == section)
        .unwrap_or_else(|| panic!("{section} is not a data section"))
}

fn terminator(section: Section) -> String {
    format!("0 / END OF {} DATA", section.name().to_uppercase())
}
