//! Section order and field-count constraints of the RAW format.
//!
//! A [`Grammar`] is built once (the revision 33 layout by default, or a
//! JSON override) and handed to the [`CaseParser`](crate::CaseParser).
//! Nothing here is global; two parsers may run with different grammars.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

/// Sections of a RAW case, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Header,
    Bus,
    Load,
    FixedShunt,
    Generator,
    Branch,
    Transformer,
    Area,
    TwoTerminalDc,
    VscDc,
    ImpedanceCorrection,
    MultiTerminalDc,
    MultiSectionLine,
    Zone,
    InterareaTransfer,
    Owner,
    FactsDevice,
    SwitchedShunt,
    Gne,
    InductionMachine,
}

impl Section {
    /// Data sections following the header and identification records.
    pub const DATA_SECTIONS: [Section; 19] = [
        Section::Bus,
        Section::Load,
        Section::FixedShunt,
        Section::Generator,
        Section::Branch,
        Section::Transformer,
        Section::Area,
        Section::TwoTerminalDc,
        Section::VscDc,
        Section::ImpedanceCorrection,
        Section::MultiTerminalDc,
        Section::MultiSectionLine,
        Section::Zone,
        Section::InterareaTransfer,
        Section::Owner,
        Section::FactsDevice,
        Section::SwitchedShunt,
        Section::Gne,
        Section::InductionMachine,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::Header => "header",
            Section::Bus => "bus",
            Section::Load => "load",
            Section::FixedShunt => "fixed shunt",
            Section::Generator => "generator",
            Section::Branch => "branch",
            Section::Transformer => "transformer",
            Section::Area => "area",
            Section::TwoTerminalDc => "two-terminal dc line",
            Section::VscDc => "vsc dc line",
            Section::ImpedanceCorrection => "transformer impedance correction",
            Section::MultiTerminalDc => "multi-terminal dc line",
            Section::MultiSectionLine => "multi-section line grouping",
            Section::Zone => "zone",
            Section::InterareaTransfer => "inter-area transfer",
            Section::Owner => "owner",
            Section::FactsDevice => "facts device",
            Section::SwitchedShunt => "switched shunt",
            Section::Gne => "gne device",
            Section::InductionMachine => "induction machine",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Inclusive bounds on the number of comma-separated fields of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRange {
    pub min: usize,
    pub max: usize,
}

impl FieldRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub const fn exactly(count: usize) -> Self {
        Self::new(count, count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformerGrammar {
    pub first_line: FieldRange,
    pub impedance_two_winding: FieldRange,
    pub winding_1_two_winding: FieldRange,
    pub winding_2_two_winding: FieldRange,
    pub impedance_three_winding: FieldRange,
    pub winding_three_winding: FieldRange,
}

impl Default for TransformerGrammar {
    fn default() -> Self {
        Self {
            first_line: FieldRange::new(20, 21),
            impedance_two_winding: FieldRange::exactly(3),
            winding_1_two_winding: FieldRange::new(16, 17),
            winding_2_two_winding: FieldRange::exactly(2),
            impedance_three_winding: FieldRange::exactly(11),
            winding_three_winding: FieldRange::exactly(17),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TwoTerminalDcGrammar {
    pub parameters: FieldRange,
    pub rectifier: FieldRange,
    pub inverter: FieldRange,
}

impl Default for TwoTerminalDcGrammar {
    fn default() -> Self {
        Self {
            parameters: FieldRange::exactly(12),
            rectifier: FieldRange::exactly(17),
            inverter: FieldRange::exactly(17),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VscDcGrammar {
    pub parameters: FieldRange,
    pub converter: FieldRange,
}

impl Default for VscDcGrammar {
    fn default() -> Self {
        Self {
            parameters: FieldRange::new(3, 11),
            converter: FieldRange::new(13, 15),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MultiTerminalDcGrammar {
    pub parameters: FieldRange,
    pub converter: FieldRange,
    pub dc_bus: FieldRange,
    pub dc_link: FieldRange,
}

impl Default for MultiTerminalDcGrammar {
    fn default() -> Self {
        Self {
            parameters: FieldRange::exactly(8),
            converter: FieldRange::exactly(16),
            dc_bus: FieldRange::exactly(8),
            dc_link: FieldRange::exactly(6),
        }
    }
}

/// Field-count constraints for every line shape of a case.
///
/// `Default` is the revision 33 layout. A JSON override only needs the
/// entries it changes:
///
/// ```
/// let grammar = pssraw::Grammar::from_json(r#"{ "bus": { "min": 9, "max": 14 } }"#).unwrap();
/// assert_eq!(grammar.bus.max, 14);
/// assert_eq!(grammar.load.min, 13);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Grammar {
    pub header: FieldRange,
    pub bus: FieldRange,
    pub load: FieldRange,
    pub fixed_shunt: FieldRange,
    pub generator: FieldRange,
    pub branch: FieldRange,
    pub transformer: TransformerGrammar,
    pub area: FieldRange,
    pub two_terminal_dc: TwoTerminalDcGrammar,
    pub vsc_dc: VscDcGrammar,
    pub impedance_correction: FieldRange,
    pub multi_terminal_dc: MultiTerminalDcGrammar,
    pub multi_section_line: FieldRange,
    pub zone: FieldRange,
    pub interarea_transfer: FieldRange,
    pub owner: FieldRange,
    pub facts_device: FieldRange,
    pub switched_shunt: FieldRange,
    pub induction_machine: FieldRange,
}

impl Default for Grammar {
    fn default() -> Self {
        Self {
            header: FieldRange::exactly(6),
            bus: FieldRange::new(9, 13),
            load: FieldRange::new(13, 14),
            fixed_shunt: FieldRange::exactly(5),
            generator: FieldRange::new(20, 28),
            branch: FieldRange::new(18, 24),
            transformer: TransformerGrammar::default(),
            area: FieldRange::new(1, 5),
            two_terminal_dc: TwoTerminalDcGrammar::default(),
            vsc_dc: VscDcGrammar::default(),
            impedance_correction: FieldRange::new(1, 23),
            multi_terminal_dc: MultiTerminalDcGrammar::default(),
            multi_section_line: FieldRange::exactly(5),
            zone: FieldRange::exactly(2),
            interarea_transfer: FieldRange::exactly(4),
            owner: FieldRange::exactly(2),
            facts_device: FieldRange::new(19, 21),
            switched_shunt: FieldRange::new(12, 26),
            induction_machine: FieldRange::exactly(34),
        }
    }
}

impl Grammar {
    /// The revision 33 layout.
    pub fn v33() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let grammar: Grammar = serde_json::from_str(text)?;
        grammar.validate()?;
        Ok(grammar)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Every range must be non-empty and require at least one field.
    pub fn validate(&self) -> Result<()> {
        for (name, range) in self.ranges() {
            if range.min == 0 || range.min > range.max {
                return Err(ParseError::Grammar {
                    message: format!(
                        "range for '{}' is {}..={}, expected 1 <= min <= max",
                        name, range.min, range.max
                    ),
                });
            }
        }
        Ok(())
    }

    fn ranges(&self) -> Vec<(&'static str, FieldRange)> {
        vec![
            ("header", self.header),
            ("bus", self.bus),
            ("load", self.load),
            ("fixed_shunt", self.fixed_shunt),
            ("generator", self.generator),
            ("branch", self.branch),
            ("transformer.first_line", self.transformer.first_line),
            (
                "transformer.impedance_two_winding",
                self.transformer.impedance_two_winding,
            ),
            (
                "transformer.winding_1_two_winding",
                self.transformer.winding_1_two_winding,
            ),
            (
                "transformer.winding_2_two_winding",
                self.transformer.winding_2_two_winding,
            ),
            (
                "transformer.impedance_three_winding",
                self.transformer.impedance_three_winding,
            ),
            (
                "transformer.winding_three_winding",
                self.transformer.winding_three_winding,
            ),
            ("area", self.area),
            ("two_terminal_dc.parameters", self.two_terminal_dc.parameters),
            ("two_terminal_dc.rectifier", self.two_terminal_dc.rectifier),
            ("two_terminal_dc.inverter", self.two_terminal_dc.inverter),
            ("vsc_dc.parameters", self.vsc_dc.parameters),
            ("vsc_dc.converter", self.vsc_dc.converter),
            ("impedance_correction", self.impedance_correction),
            ("multi_terminal_dc.parameters", self.multi_terminal_dc.parameters),
            ("multi_terminal_dc.converter", self.multi_terminal_dc.converter),
            ("multi_terminal_dc.dc_bus", self.multi_terminal_dc.dc_bus),
            ("multi_terminal_dc.dc_link", self.multi_terminal_dc.dc_link),
            ("multi_section_line", self.multi_section_line),
            ("zone", self.zone),
            ("interarea_transfer", self.interarea_transfer),
            ("owner", self.owner),
            ("facts_device", self.facts_device),
            ("switched_shunt", self.switched_shunt),
            ("induction_machine", self.induction_machine),
        ]
    }
}
