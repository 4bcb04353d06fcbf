use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParseWarning;
use crate::records::*;

/// A parsed RAW case: header values plus one sequence per record kind, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    // Header
    pub ic: i64,
    pub base_mva: f64,
    pub revision: i64,
    pub transformer_rating: f64,
    pub nominal_rating: f64,
    pub base_frequency: f64,
    /// Comment on the header line
    pub case_name: String,
    /// Free-text identification records 1 and 2
    pub identification: [String; 2],

    pub buses: Vec<Bus>,
    pub loads: Vec<Load>,
    pub fixed_shunts: Vec<FixedShunt>,
    pub generators: Vec<Generator>,
    pub branches: Vec<Branch>,
    pub two_winding_transformers: Vec<TwoWindingTransformer>,
    pub three_winding_transformers: Vec<ThreeWindingTransformer>,
    pub areas: Vec<Area>,
    pub two_terminal_dc_lines: Vec<TwoTerminalDcLine>,
    pub vsc_dc_lines: Vec<VscDcLine>,
    pub impedance_corrections: Vec<ImpedanceCorrection>,
    pub multi_terminal_dc_lines: Vec<MultiTerminalDcLine>,
    pub multi_section_lines: Vec<MultiSectionLineGrouping>,
    pub zones: Vec<Zone>,
    pub interarea_transfers: Vec<InterareaTransfer>,
    pub owners: Vec<Owner>,
    pub facts_devices: Vec<FactsDevice>,
    pub switched_shunts: Vec<SwitchedShunt>,
    pub induction_machines: Vec<InductionMachine>,

    /// Non-fatal problems met while parsing
    pub warnings: Vec<ParseWarning>,
}

impl Case {
    pub fn new(base_mva: f64, revision: i64, base_frequency: f64) -> Self {
        Self {
            ic: 0,
            base_mva,
            revision,
            transformer_rating: 0.0,
            nominal_rating: 1.0,
            base_frequency,
            case_name: String::new(),
            identification: [String::new(), String::new()],
            buses: Vec::new(),
            loads: Vec::new(),
            fixed_shunts: Vec::new(),
            generators: Vec::new(),
            branches: Vec::new(),
            two_winding_transformers: Vec::new(),
            three_winding_transformers: Vec::new(),
            areas: Vec::new(),
            two_terminal_dc_lines: Vec::new(),
            vsc_dc_lines: Vec::new(),
            impedance_corrections: Vec::new(),
            multi_terminal_dc_lines: Vec::new(),
            multi_section_lines: Vec::new(),
            zones: Vec::new(),
            interarea_transfers: Vec::new(),
            owners: Vec::new(),
            facts_devices: Vec::new(),
            switched_shunts: Vec::new(),
            induction_machines: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn push_transformer(&mut self, transformer: Transformer) {
        match transformer {
            Transformer::TwoWinding(t) => self.two_winding_transformers.push(t),
            Transformer::ThreeWinding(t) => self.three_winding_transformers.push(t),
        }
    }

    /// All transformers of both shapes, in file order.
    pub fn transformers(&self) -> Vec<Transformer> {
        let mut transformers: Vec<Transformer> = self
            .two_winding_transformers
            .iter()
            .cloned()
            .map(Transformer::TwoWinding)
            .chain(
                self.three_winding_transformers
                    .iter()
                    .cloned()
                    .map(Transformer::ThreeWinding),
            )
            .collect();
        transformers.sort_by_key(Transformer::index);
        transformers
    }

    /// Record counts per section, in section order.
    pub fn section_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("buses", self.buses.len()),
            ("loads", self.loads.len()),
            ("fixed shunts", self.fixed_shunts.len()),
            ("generators", self.generators.len()),
            ("branches", self.branches.len()),
            ("two-winding transformers", self.two_winding_transformers.len()),
            ("three-winding transformers", self.three_winding_transformers.len()),
            ("areas", self.areas.len()),
            ("two-terminal dc lines", self.two_terminal_dc_lines.len()),
            ("vsc dc lines", self.vsc_dc_lines.len()),
            ("impedance corrections", self.impedance_corrections.len()),
            ("multi-terminal dc lines", self.multi_terminal_dc_lines.len()),
            ("multi-section lines", self.multi_section_lines.len()),
            ("zones", self.zones.len()),
            ("inter-area transfers", self.interarea_transfers.len()),
            ("owners", self.owners.len()),
            ("facts devices", self.facts_devices.len()),
            ("switched shunts", self.switched_shunts.len()),
            ("induction machines", self.induction_machines.len()),
        ]
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Case: {}  Sbase: {} MVA  Revision: {}  Frequency: {} Hz",
            self.case_name, self.base_mva, self.revision, self.base_frequency
        )?;
        for line in &self.identification {
            if !line.trim().is_empty() {
                writeln!(f, "  {}", line.trim())?;
            }
        }
        writeln!(f)?;
        for (name, count) in self.section_counts() {
            writeln!(f, "{:>8} {}", count, name)?;
        }
        if !self.warnings.is_empty() {
            writeln!(f, "\n=== Warnings ===")?;
            for warning in &self.warnings {
                writeln!(f, "  {}", warning)?;
            }
        }
        Ok(())
    }
}
