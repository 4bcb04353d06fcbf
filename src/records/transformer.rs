//! Transformer records.
//!
//! A transformer spans four physical lines (two-winding) or five
//! (three-winding). The third bus number `k` on the first line selects the
//! shape, so the header is decoded before the remaining lines are read.

use serde::{Deserialize, Serialize};

use crate::table::{FieldValue, Tabular, prefixed};

record! {
    /// First line, common to both shapes.
    TransformerHeader {
        i: i64,
        j: i64,
        /// Third winding bus, 0 for a two-winding transformer
        k: i64,
        ckt: String,
        cw: i64,
        cz: i64,
        cm: i64,
        mag1: f64,
        mag2: f64,
        nmetr: i64,
        name: String,
        stat: i64,
        o1: i64,
        f1: f64,
        o2: i64,
        f2: f64,
        o3: i64,
        f3: f64,
        o4: i64,
        f4: f64,
        vecgrp: String = "",
    }
}

impl TransformerHeader {
    pub fn is_three_winding(&self) -> bool {
        self.k != 0
    }
}

record! {
    /// Second line of a two-winding transformer.
    TwoWindingImpedance {
        r1_2: f64,
        x1_2: f64,
        sbase1_2: f64,
    }
}

record! {
    /// Second line of a three-winding transformer.
    ThreeWindingImpedance {
        r1_2: f64,
        x1_2: f64,
        sbase1_2: f64,
        r2_3: f64,
        x2_3: f64,
        sbase2_3: f64,
        r3_1: f64,
        x3_1: f64,
        sbase3_1: f64,
        /// Star bus voltage magnitude and angle
        vmstar: f64,
        anstar: f64,
    }
}

record! {
    /// Full winding line. `index` is the winding number.
    Winding {
        windv: f64,
        nomv: f64,
        ang: f64,
        rata: f64,
        ratb: f64,
        ratc: f64,
        cod: i64,
        cont: i64,
        rma: f64,
        rmi: f64,
        vma: f64,
        vmi: f64,
        ntp: i64,
        tab: i64,
        cr: f64,
        cx: f64,
        cnxa: f64 = 0.0,
    }
}

record! {
    /// Second winding of a two-winding transformer: ratio and nominal voltage only.
    WindingRatio {
        windv: f64,
        nomv: f64,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoWindingTransformer {
    pub index: usize,
    pub header: TransformerHeader,
    pub impedance: TwoWindingImpedance,
    pub winding_1: Winding,
    pub winding_2: WindingRatio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreeWindingTransformer {
    pub index: usize,
    pub header: TransformerHeader,
    pub impedance: ThreeWindingImpedance,
    pub winding_1: Winding,
    pub winding_2: Winding,
    pub winding_3: Winding,
}

/// One transformer record of either shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Transformer {
    TwoWinding(TwoWindingTransformer),
    ThreeWinding(ThreeWindingTransformer),
}

impl Transformer {
    pub fn index(&self) -> usize {
        match self {
            Transformer::TwoWinding(t) => t.index,
            Transformer::ThreeWinding(t) => t.index,
        }
    }

    pub fn header(&self) -> &TransformerHeader {
        match self {
            Transformer::TwoWinding(t) => &t.header,
            Transformer::ThreeWinding(t) => &t.header,
        }
    }

    /// Physical lines the record occupies.
    pub fn line_count(&self) -> usize {
        match self {
            Transformer::TwoWinding(_) => 4,
            Transformer::ThreeWinding(_) => 5,
        }
    }
}

impl Tabular for TwoWindingTransformer {
    fn columns() -> Vec<String> {
        std::iter::once("index".to_string())
            .chain(prefixed("", TransformerHeader::FIELDS))
            .chain(prefixed("", TwoWindingImpedance::FIELDS))
            .chain(prefixed("w1_", Winding::FIELDS))
            .chain(prefixed("w2_", WindingRatio::FIELDS))
            .collect()
    }

    fn row(&self) -> Vec<FieldValue> {
        let mut row = vec![FieldValue::from(self.index)];
        row.extend(self.header.values());
        row.extend(self.impedance.values());
        row.extend(self.winding_1.values());
        row.extend(self.winding_2.values());
        row
    }
}

impl Tabular for ThreeWindingTransformer {
    fn columns() -> Vec<String> {
        std::iter::once("index".to_string())
            .chain(prefixed("", TransformerHeader::FIELDS))
            .chain(prefixed("", ThreeWindingImpedance::FIELDS))
            .chain(prefixed("w1_", Winding::FIELDS))
            .chain(prefixed("w2_", Winding::FIELDS))
            .chain(prefixed("w3_", Winding::FIELDS))
            .collect()
    }

    fn row(&self) -> Vec<FieldValue> {
        let mut row = vec![FieldValue::from(self.index)];
        row.extend(self.header.values());
        row.extend(self.impedance.values());
        row.extend(self.winding_1.values());
        row.extend(self.winding_2.values());
        row.extend(self.winding_3.values());
        row
    }
}
