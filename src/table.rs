//! Flat tabular projection of parsed records.
//!
//! Every record kind maps to one named table whose column order is fixed:
//! `index` first, then the record's fields in file order. Composite records
//! prefix the columns of their sub-records (`w1_windv`, `rectifier_ip`).
//! Multi-terminal DC lines have a variable shape, so their converters, DC
//! buses and DC links get child tables keyed by `line_index`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::case::Case;

/// One cell of a projected row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Real(f64),
    Text(String),
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl From<&i64> for FieldValue {
    fn from(value: &i64) -> Self {
        FieldValue::Int(*value)
    }
}

impl From<&f64> for FieldValue {
    fn from(value: &f64) -> Self {
        FieldValue::Real(*value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Real(v) => write!(f, "{}", v),
            FieldValue::Text(v) => write!(f, "'{}'", v),
        }
    }
}

/// A record kind with a fixed column layout.
pub trait Tabular {
    fn columns() -> Vec<String>;
    fn row(&self) -> Vec<FieldValue>;
}

/// `fields` with `prefix` prepended to each name.
pub fn prefixed<'a>(
    prefix: &'a str,
    fields: &'a [&'a str],
) -> impl Iterator<Item = String> + 'a {
    fields.iter().map(move |field| format!("{prefix}{field}"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<FieldValue>>,
}

impl Table {
    pub fn from_records<T: Tabular>(name: &str, records: &[T]) -> Self {
        Self {
            name: name.to_string(),
            columns: T::columns(),
            rows: records.iter().map(Tabular::row).collect(),
        }
    }

    /// Child rows of every parent, each prefixed with the parent's index.
    fn from_children<P, C: Tabular>(
        name: &str,
        parents: &[P],
        parent_index: impl Fn(&P) -> usize,
        children: impl Fn(&P) -> &[C],
    ) -> Self {
        let columns = std::iter::once("line_index".to_string())
            .chain(C::columns())
            .collect();
        let rows = parents
            .iter()
            .flat_map(|parent| {
                let index = parent_index(parent);
                children(parent).iter().map(move |child| {
                    let mut row = vec![FieldValue::from(index)];
                    row.extend(child.row());
                    row
                })
            })
            .collect();
        Self {
            name: name.to_string(),
            columns,
            rows,
        }
    }
}

impl Case {
    /// Names accepted by [`Case::table`], in section order.
    pub const TABLE_NAMES: [&'static str; 23] = [
        "bus",
        "load",
        "fixed_shunt",
        "generator",
        "branch",
        "transformer_2w",
        "transformer_3w",
        "area",
        "two_terminal_dc",
        "vsc_dc",
        "impedance_correction",
        "multi_terminal_dc",
        "multi_terminal_dc_converter",
        "multi_terminal_dc_bus",
        "multi_terminal_dc_link",
        "multi_section_line",
        "zone",
        "interarea_transfer",
        "owner",
        "facts_device",
        "switched_shunt",
        "induction_machine",
        "warning",
    ];

    pub fn table(&self, name: &str) -> Option<Table> {
        let mtdc = &self.multi_terminal_dc_lines;
        let table = match name {
            "bus" => Table::from_records(name, &self.buses),
            "load" => Table::from_records(name, &self.loads),
            "fixed_shunt" => Table::from_records(name, &self.fixed_shunts),
            "generator" => Table::from_records(name, &self.generators),
            "branch" => Table::from_records(name, &self.branches),
            "transformer_2w" => Table::from_records(name, &self.two_winding_transformers),
            "transformer_3w" => Table::from_records(name, &self.three_winding_transformers),
            "area" => Table::from_records(name, &self.areas),
            "two_terminal_dc" => Table::from_records(name, &self.two_terminal_dc_lines),
            "vsc_dc" => Table::from_records(name, &self.vsc_dc_lines),
            "impedance_correction" => Table::from_records(name, &self.impedance_corrections),
            "multi_terminal_dc" => Table::from_records(name, mtdc),
            "multi_terminal_dc_converter" => {
                Table::from_children(name, mtdc, |l| l.index, |l| l.converters.as_slice())
            }
            "multi_terminal_dc_bus" => {
                Table::from_children(name, mtdc, |l| l.index, |l| l.dc_buses.as_slice())
            }
            "multi_terminal_dc_link" => {
                Table::from_children(name, mtdc, |l| l.index, |l| l.dc_links.as_slice())
            }
            "multi_section_line" => Table::from_records(name, &self.multi_section_lines),
            "zone" => Table::from_records(name, &self.zones),
            "interarea_transfer" => Table::from_records(name, &self.interarea_transfers),
            "owner" => Table::from_records(name, &self.owners),
            "facts_device" => Table::from_records(name, &self.facts_devices),
            "switched_shunt" => Table::from_records(name, &self.switched_shunts),
            "induction_machine" => Table::from_records(name, &self.induction_machines),
            "warning" => Table {
                name: name.to_string(),
                columns: vec!["message".to_string()],
                rows: self
                    .warnings
                    .iter()
                    .map(|w| vec![FieldValue::Text(w.to_string())])
                    .collect(),
            },
            _ => return None,
        };
        Some(table)
    }

    pub fn tables(&self) -> Vec<Table> {
        Self::TABLE_NAMES
            .iter()
            .filter_map(|name| self.table(name))
            .collect()
    }
}
