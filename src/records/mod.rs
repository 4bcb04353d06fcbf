//! Typed records, one decoder per record kind and per composite line.
//!
//! Every decoder takes the raw field strings of one line plus the record's
//! index and returns the record or a [`FieldError`](crate::FieldError).
//! Decoders never look at other records.

#[macro_use]
pub(crate) mod fields;

mod dc;
mod groups;
mod network;
mod transformer;

pub use dc::{
    MultiTerminalDcBus, MultiTerminalDcConverter, MultiTerminalDcCounts, MultiTerminalDcLine,
    MultiTerminalDcLink, MultiTerminalDcParameters, TwoTerminalDcConverter, TwoTerminalDcLine,
    TwoTerminalDcParameters, VscDcConverter, VscDcLine, VscDcParameters,
};
pub use groups::{
    Area, ImpedanceCorrection, InterareaTransfer, MultiSectionLineGrouping, Owner, Zone,
};
pub use network::{
    Branch, Bus, BusType, FactsDevice, FixedShunt, Generator, InductionMachine, Load,
    SwitchedShunt,
};
pub use transformer::{
    ThreeWindingImpedance, ThreeWindingTransformer, Transformer, TransformerHeader,
    TwoWindingImpedance, TwoWindingTransformer, Winding, WindingRatio,
};
