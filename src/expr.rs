//! Expressions evaluated per pixel by the map host.
//!
//! An [`Expression`] serializes to the host's JSON array notation
//! (`["/", ["-", ["band", 3], ["band", 2]], …]`) and displays as the
//! flat infix string shown next to an index in selectors (`B3 - B2 / B3 + B2`).
//! The infix form joins operands without parentheses, so it is a label
//! and not a faithful rendering of precedence.

use std::collections::BTreeSet;
use std::fmt;

use rgb::RGBA;
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

use crate::layers::BandSlot;
use crate::ramp::{css_rgba, ColorStops};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp { Eq, Ne, Lt, Le, Gt, Ge }

impl CmpOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Number(f64),
    /// Value of the 1-based band slot.
    Band(BandSlot),
    /// Named style variable.
    Var(String),
    Add(Vec<Expression>),
    Sub(Vec<Expression>),
    Mul(Vec<Expression>),
    Div(Vec<Expression>),
    Sqrt(Box<Expression>),
    Compare(CmpOp, Box<Expression>, Box<Expression>),
    /// First value whose condition holds, else `fallback`.
    Case { branches: Vec<(Expression, Expression)>, fallback: Box<Expression> },
    /// Linear interpolation of `input` over color stops.
    Interpolate { input: Box<Expression>, stops: ColorStops },
    Array(Vec<Expression>),
    Color(RGBA<f64>),
}

impl Expression {
    pub fn band(slot: u8) -> Self { Expression::Band(BandSlot(slot)) }

    pub fn var(name: &str) -> Self { Expression::Var(name.to_string()) }

    pub fn sqrt(x: Expression) -> Self { Expression::Sqrt(Box::new(x)) }

    pub fn compare(op: CmpOp, a: Expression, b: Expression) -> Self {
        Expression::Compare(op, Box::new(a), Box::new(b))
    }

    pub fn interpolate(input: Expression, stops: ColorStops) -> Self {
        Expression::Interpolate { input: Box::new(input), stops }
    }

    /// The band slots this expression reads, in increasing order.
    pub fn band_slots(&self) -> BTreeSet<BandSlot> {
        let mut slots = BTreeSet::new();
        self.collect_slots(&mut slots);
        slots
    }

    fn collect_slots(&self, slots: &mut BTreeSet<BandSlot>) {
        use Expression::*;
        match self {
            Band(slot) => { slots.insert(*slot); }
            Number(_) | Var(_) | Color(_) => {}
            Add(xs) | Sub(xs) | Mul(xs) | Div(xs) | Array(xs) => {
                xs.iter().for_each(|x| x.collect_slots(slots))
            }
            Sqrt(x) => x.collect_slots(slots),
            Compare(_, a, b) => { a.collect_slots(slots); b.collect_slots(slots) }
            Case { branches, fallback } => {
                for (cond, value) in branches {
                    cond.collect_slots(slots);
                    value.collect_slots(slots);
                }
                fallback.collect_slots(slots)
            }
            Interpolate { input, .. } => input.collect_slots(slots),
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, xs: &[Expression], sep: &str) -> fmt::Result {
    for (i, x) in xs.iter().enumerate() {
        if i > 0 { f.write_str(sep)? }
        write!(f, "{x}")?;
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expression::*;
        match self {
            Number(x) => write!(f, "{x}"),
            Band(slot) => write!(f, "{slot}"),
            Var(name) => f.write_str(name),
            Add(xs) => join(f, xs, " + "),
            Sub(xs) => join(f, xs, " - "),
            Mul(xs) => join(f, xs, " * "),
            Div(xs) => join(f, xs, " / "),
            Sqrt(x) => write!(f, "sqrt({x})"),
            Compare(op, a, b) => write!(f, "{a} {} {b}", op.as_str()),
            Case { branches, fallback } => {
                f.write_str("case(")?;
                for (cond, value) in branches {
                    write!(f, "{cond} ? {value}, ")?;
                }
                write!(f, "{fallback})")
            }
            Interpolate { input, .. } => write!(f, "interpolate({input})"),
            Array(xs) => { f.write_str("[")?; join(f, xs, ", ")?; f.write_str("]") }
            Color(c) => f.write_str(&css_rgba(*c)),
        }
    }
}

fn op_seq<S: Serializer>(ser: S, op: &str, xs: &[Expression]) -> Result<S::Ok, S::Error> {
    let mut seq = ser.serialize_seq(Some(xs.len() + 1))?;
    seq.serialize_element(op)?;
    for x in xs {
        seq.serialize_element(x)?;
    }
    seq.end()
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        use Expression::*;
        match self {
            Number(x) => ser.serialize_f64(*x),
            Band(slot) => ("band", slot).serialize(ser),
            Var(name) => ("var", name).serialize(ser),
            Add(xs) => op_seq(ser, "+", xs),
            Sub(xs) => op_seq(ser, "-", xs),
            Mul(xs) => op_seq(ser, "*", xs),
            Div(xs) => op_seq(ser, "/", xs),
            Sqrt(x) => ("sqrt", x).serialize(ser),
            Compare(op, a, b) => (op.as_str(), a, b).serialize(ser),
            Case { branches, fallback } => {
                let mut seq = ser.serialize_seq(Some(2 * branches.len() + 2))?;
                seq.serialize_element("case")?;
                for (cond, value) in branches {
                    seq.serialize_element(cond)?;
                    seq.serialize_element(value)?;
                }
                seq.serialize_element(fallback)?;
                seq.end()
            }
            Interpolate { input, stops } => {
                let flat = stops.to_flat();
                let mut seq = ser.serialize_seq(Some(flat.len() + 3))?;
                seq.serialize_element("interpolate")?;
                seq.serialize_element(&["linear"])?;
                seq.serialize_element(input)?;
                for entry in &flat {
                    seq.serialize_element(entry)?;
                }
                seq.end()
            }
            Array(xs) => op_seq(ser, "array", xs),
            Color(c) => [c.r, c.g, c.b, c.a].serialize(ser),
        }
    }
}
