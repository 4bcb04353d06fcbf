use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use crate::case::Case;
use crate::error::{FieldError, ParseError, ParseWarning, Result};
use crate::grammar::{FieldRange, Grammar, Section};
use crate::records::fields::{FieldKind, Fields};
use crate::records::*;
use crate::tokenize::{LineRequirements, TokenizedLine, split_line};

/// Ends the current table.
const TABLE_TERMINUS: &str = "0";
/// Ends the whole block of data sections; never consumed by a section.
const RECORD_TERMINUS: &str = "Q";

const EXPECTED_REVISION: i64 = 33;

/// Parses RAW cases against one [`Grammar`].
#[derive(Debug, Clone, Copy)]
pub struct CaseParser<'g> {
    grammar: &'g Grammar,
}

impl<'g> CaseParser<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    /// Reads the whole file; invalid UTF-8 is replaced rather than rejected.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Case> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Parsing case file {}", path.display());
        self.parse_str(&String::from_utf8_lossy(&bytes))
    }

    pub fn parse_str(&self, text: &str) -> Result<Case> {
        let lines: Vec<&str> = text.lines().collect();
        self.parse_lines(&lines)
    }

    pub fn parse_lines(&self, lines: &[&str]) -> Result<Case> {
        // header values plus the two identification records
        if lines.len() < 3 {
            return Err(ParseError::TooFewLines {
                found: lines.len(),
                required: 3,
            });
        }

        let grammar = self.grammar;
        let mut reader = Reader::new(lines, grammar);
        let mut case = reader.header()?;
        case.identification = [
            reader.raw_line(Section::Header)?.trim_end().to_string(),
            reader.raw_line(Section::Header)?.trim_end().to_string(),
        ];
        debug!("record 1: {}", case.identification[0]);
        debug!("record 2: {}", case.identification[1]);

        case.buses = reader.flat(Section::Bus, grammar.bus, Bus::decode)?;
        case.loads = reader.flat(Section::Load, grammar.load, Load::decode)?;
        case.fixed_shunts =
            reader.flat(Section::FixedShunt, grammar.fixed_shunt, FixedShunt::decode)?;
        case.generators = reader.flat(Section::Generator, grammar.generator, Generator::decode)?;
        case.branches = reader.flat(Section::Branch, grammar.branch, Branch::decode)?;

        for transformer in reader.section(Section::Transformer, Reader::decode_transformer)? {
            case.push_transformer(transformer);
        }

        case.areas = reader.flat(Section::Area, grammar.area, Area::decode)?;
        case.two_terminal_dc_lines =
            reader.section(Section::TwoTerminalDc, Reader::decode_two_terminal_dc)?;
        case.vsc_dc_lines = reader.section(Section::VscDc, Reader::decode_vsc_dc)?;
        case.impedance_corrections = reader.flat(
            Section::ImpedanceCorrection,
            grammar.impedance_correction,
            ImpedanceCorrection::decode,
        )?;
        case.multi_terminal_dc_lines =
            reader.section(Section::MultiTerminalDc, Reader::decode_multi_terminal_dc)?;
        case.multi_section_lines = reader.flat(
            Section::MultiSectionLine,
            grammar.multi_section_line,
            MultiSectionLineGrouping::decode,
        )?;
        case.zones = reader.flat(Section::Zone, grammar.zone, Zone::decode)?;
        case.interarea_transfers = reader.flat(
            Section::InterareaTransfer,
            grammar.interarea_transfer,
            InterareaTransfer::decode,
        )?;
        case.owners = reader.flat(Section::Owner, grammar.owner, Owner::decode)?;
        case.facts_devices =
            reader.flat(Section::FactsDevice, grammar.facts_device, FactsDevice::decode)?;
        case.switched_shunts =
            reader.flat(Section::SwitchedShunt, grammar.switched_shunt, SwitchedShunt::decode)?;
        reader.skip_gne();
        case.induction_machines = reader.flat(
            Section::InductionMachine,
            grammar.induction_machine,
            InductionMachine::decode,
        )?;

        reader.finish();
        case.warnings = reader.warnings;

        info!(
            "Parsed case '{}': {} buses, {} branches, {} transformers, {} generators, {} warnings",
            case.case_name,
            case.buses.len(),
            case.branches.len(),
            case.two_winding_transformers.len() + case.three_winding_transformers.len(),
            case.generators.len(),
            case.warnings.len()
        );
        Ok(case)
    }
}

/// Line cursor with one line of lookahead.
///
/// The peeked line is tokenized once and cached; reading the record that
/// starts on it reuses the cached tokens.
struct Reader<'a> {
    lines: &'a [&'a str],
    grammar: &'a Grammar,
    /// 0-based index of the next unread line
    position: usize,
    peeked: Option<TokenizedLine>,
    terminus_missing: bool,
    warnings: Vec<ParseWarning>,
}

impl<'a> Reader<'a> {
    fn new(lines: &'a [&'a str], grammar: &'a Grammar) -> Self {
        Self {
            lines,
            grammar,
            position: 0,
            peeked: None,
            terminus_missing: false,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, warning: ParseWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn peek(&mut self) -> Option<&TokenizedLine> {
        if self.peeked.is_none() {
            let line = *self.lines.get(self.position)?;
            self.peeked = Some(split_line(line));
        }
        self.peeked.as_ref()
    }

    fn advance(&mut self) {
        self.position += 1;
        self.peeked = None;
    }

    /// True when the next line ends `section`.
    ///
    /// Running out of input counts as the record terminus; that is reported
    /// once per parse.
    fn at_terminus(&mut self, section: Section) -> bool {
        match self.peek() {
            Some(tokens) => matches!(tokens.first_field(), TABLE_TERMINUS | RECORD_TERMINUS),
            None => {
                if !self.terminus_missing {
                    self.terminus_missing = true;
                    self.warn(ParseWarning::MissingTerminus { section });
                }
                true
            }
        }
    }

    /// Consume the line that ended a section, unless it is the record terminus.
    fn end_section(&mut self) {
        if self.peek().map(TokenizedLine::first_field) == Some(TABLE_TERMINUS) {
            self.advance();
        }
    }

    fn end_of_input(&self, section: Section) -> ParseError {
        ParseError::UnexpectedEnd {
            line: self.lines.len(),
            section,
        }
    }

    fn raw_line(&mut self, section: Section) -> Result<&'a str> {
        let line = *self
            .lines
            .get(self.position)
            .ok_or_else(|| self.end_of_input(section))?;
        self.advance();
        Ok(line)
    }

    /// Next line, tokenized and checked against `range`. Returns its 1-based number.
    fn read(&mut self, section: Section, range: FieldRange) -> Result<(usize, TokenizedLine)> {
        if self.position >= self.lines.len() {
            return Err(self.end_of_input(section));
        }
        let line = self.position + 1;
        let mut tokens = match self.peeked.take() {
            Some(tokens) => tokens,
            None => split_line(self.lines[self.position]),
        };
        self.advance();

        if let Some(warning) = tokens.enforce(&LineRequirements::new(line, section, range))? {
            self.warn(warning);
        }
        Ok((line, tokens))
    }

    /// Read one line and decode it as a `T`.
    fn record<T>(
        &mut self,
        section: Section,
        range: FieldRange,
        index: usize,
        decode: impl Fn(usize, &[String]) -> std::result::Result<T, FieldError>,
    ) -> Result<T> {
        let (line, tokens) = self.read(section, range)?;
        decode(index, &tokens.fields).map_err(|e| e.at(line, section))
    }

    /// Decode records until the section's terminus, numbering them from zero.
    fn section<T>(
        &mut self,
        section: Section,
        mut decode: impl FnMut(&mut Self, usize) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut records = Vec::new();
        while !self.at_terminus(section) {
            let record = decode(self, records.len())?;
            records.push(record);
        }
        self.end_section();
        debug!("parsed {} {} records", records.len(), section);
        Ok(records)
    }

    /// A section of single-line records.
    fn flat<T>(
        &mut self,
        section: Section,
        range: FieldRange,
        decode: impl Fn(usize, &[String]) -> std::result::Result<T, FieldError>,
    ) -> Result<Vec<T>> {
        self.section(section, |reader, index| {
            reader.record(section, range, index, &decode)
        })
    }

    fn header(&mut self) -> Result<Case> {
        let section = Section::Header;
        let (line, tokens) = self.read(section, self.grammar.header)?;
        let mut fields = Fields::new(&tokens.fields);
        let at = |e: FieldError| e.at(line, section);

        let ic = tokens.fields[0].trim();
        if !ic.is_empty() && ic != "0" {
            return Err(ParseError::UnsupportedChangeCode {
                line,
                section,
                value: ic.to_string(),
            });
        }
        let ic = i64::read_or(&mut fields, "ic", 0).map_err(at)?;

        let base_mva = f64::read_or(&mut fields, "sbase", 100.0).map_err(at)?;
        let revision = self.revision(fields.text("rev").map_err(at)?);
        let transformer_rating = f64::read_or(&mut fields, "xfrrat", 0.0).map_err(at)?;
        let nominal_rating = f64::read_or(&mut fields, "nxfrat", 1.0).map_err(at)?;
        let base_frequency = f64::read_or(&mut fields, "basfrq", 60.0).map_err(at)?;

        let mut case = Case::new(base_mva, revision, base_frequency);
        case.ic = ic;
        case.transformer_rating = transformer_rating;
        case.nominal_rating = nominal_rating;
        case.case_name = tokens.comment.clone().unwrap_or_default();
        debug!(
            "case data: sbase={} rev={} xfrrat={} nxfrat={} basfrq={}",
            base_mva, revision, transformer_rating, nominal_rating, base_frequency
        );
        Ok(case)
    }

    /// Revision number from the REV field; anything unusable falls back to 33.
    fn revision(&mut self, raw: String) -> i64 {
        if raw.is_empty() {
            self.warn(ParseWarning::MissingRevision);
            return EXPECTED_REVISION;
        }
        let revision = match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => value.trunc() as i64,
            _ => {
                self.warn(ParseWarning::InvalidRevision { value: raw });
                return EXPECTED_REVISION;
            }
        };
        if revision != EXPECTED_REVISION {
            self.warn(ParseWarning::UnsupportedRevision { revision });
        }
        revision
    }

    /// Four lines when the third bus `k` is zero, five otherwise.
    fn decode_transformer(&mut self, index: usize) -> Result<Transformer> {
        let section = Section::Transformer;
        let grammar = self.grammar;
        let grammar = &grammar.transformer;
        let header = self.record(section, grammar.first_line, index, TransformerHeader::decode)?;

        if header.is_three_winding() {
            let impedance = self.record(
                section,
                grammar.impedance_three_winding,
                index,
                ThreeWindingImpedance::decode,
            )?;
            let winding = grammar.winding_three_winding;
            Ok(Transformer::ThreeWinding(ThreeWindingTransformer {
                index,
                header,
                impedance,
                winding_1: self.record(section, winding, 1, Winding::decode)?,
                winding_2: self.record(section, winding, 2, Winding::decode)?,
                winding_3: self.record(section, winding, 3, Winding::decode)?,
            }))
        } else {
            Ok(Transformer::TwoWinding(TwoWindingTransformer {
                index,
                header,
                impedance: self.record(
                    section,
                    grammar.impedance_two_winding,
                    index,
                    TwoWindingImpedance::decode,
                )?,
                winding_1: self.record(section, grammar.winding_1_two_winding, 1, Winding::decode)?,
                winding_2: self.record(
                    section,
                    grammar.winding_2_two_winding,
                    2,
                    WindingRatio::decode,
                )?,
            }))
        }
    }

    fn decode_two_terminal_dc(&mut self, index: usize) -> Result<TwoTerminalDcLine> {
        let section = Section::TwoTerminalDc;
        let grammar = self.grammar;
        let grammar = &grammar.two_terminal_dc;
        Ok(TwoTerminalDcLine {
            index,
            parameters: self.record(
                section,
                grammar.parameters,
                index,
                TwoTerminalDcParameters::decode,
            )?,
            rectifier: self.record(section, grammar.rectifier, 0, TwoTerminalDcConverter::decode)?,
            inverter: self.record(section, grammar.inverter, 1, TwoTerminalDcConverter::decode)?,
        })
    }

    fn decode_vsc_dc(&mut self, index: usize) -> Result<VscDcLine> {
        let section = Section::VscDc;
        let grammar = self.grammar;
        let grammar = &grammar.vsc_dc;
        Ok(VscDcLine {
            index,
            parameters: self.record(section, grammar.parameters, index, VscDcParameters::decode)?,
            converter_1: self.record(section, grammar.converter, 0, VscDcConverter::decode)?,
            converter_2: self.record(section, grammar.converter, 1, VscDcConverter::decode)?,
        })
    }

    /// Header line, then as many converter, DC bus and DC link lines as it declares.
    fn decode_multi_terminal_dc(&mut self, index: usize) -> Result<MultiTerminalDcLine> {
        let section = Section::MultiTerminalDc;
        let grammar = self.grammar;
        let grammar = &grammar.multi_terminal_dc;
        let (line, tokens) = self.read(section, grammar.parameters)?;
        let at = |e: FieldError| e.at(line, section);
        let parameters = MultiTerminalDcParameters::decode(index, &tokens.fields).map_err(at)?;
        let counts = parameters.counts().map_err(at)?;

        let converters = (0..counts.converters)
            .map(|i| self.record(section, grammar.converter, i, MultiTerminalDcConverter::decode))
            .collect::<Result<Vec<_>>>()?;
        let dc_buses = (0..counts.dc_buses)
            .map(|i| self.record(section, grammar.dc_bus, i, MultiTerminalDcBus::decode))
            .collect::<Result<Vec<_>>>()?;
        let dc_links = (0..counts.dc_links)
            .map(|i| self.record(section, grammar.dc_link, i, MultiTerminalDcLink::decode))
            .collect::<Result<Vec<_>>>()?;

        MultiTerminalDcLine::assemble(index, parameters, converters, dc_buses, dc_links).map_err(at)
    }

    /// GNE data is recognized but not parsed.
    fn skip_gne(&mut self) {
        let mut count = 0;
        while !self.at_terminus(Section::Gne) {
            self.advance();
            count += 1;
        }
        self.end_section();
        if count > 0 {
            self.warn(ParseWarning::SkippedGneLines { count });
        }
    }

    /// Consume the record terminus and report whatever follows it.
    fn finish(&mut self) {
        match self.peek().map(TokenizedLine::first_field) {
            Some(RECORD_TERMINUS) => self.advance(),
            Some(_) => {}
            None => {
                if !self.terminus_missing {
                    self.terminus_missing = true;
                    self.warn(ParseWarning::MissingTerminus {
                        section: Section::InductionMachine,
                    });
                }
            }
        }

        let lines = self.lines;
        let start = self.position.min(lines.len());
        let remaining: Vec<(usize, &str)> = lines[start..]
            .iter()
            .enumerate()
            .map(|(offset, line)| (start + offset + 1, line.trim_end()))
            .filter(|(_, line)| !line.trim().is_empty())
            .collect();
        if let Some(&(first_line, _)) = remaining.first() {
            self.warn(ParseWarning::UnparsedLines {
                first_line,
                lines: remaining.into_iter().map(|(_, line)| line.to_string()).collect(),
            });
        }
    }
}
