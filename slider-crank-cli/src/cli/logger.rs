use serde::ser::{
    Error as _, Impossible, Serialize, SerializeSeq, SerializeStruct, SerializeTuple,
    SerializeTupleStruct, SerializeTupleVariant, Serializer,
};
use std::io::Write;

macro_rules! impl_leaf_methods {
    ($(($method:ident, $ty:ty)),+ $(,)?) => {$(
        fn $method(self, v: $ty) -> Result<Self::Ok, Self::Error> {
            self.leaf(v)
        }
    )+};
}

macro_rules! impl_seq {
    ($(($trait:ident, $method:ident)),+ $(,)?) => {$(
        impl<W: Write> $trait for Seq<'_, W> {
            type Ok = ();
            type Error = Error;

            fn $method<T>(&mut self, value: &T) -> Result<(), Error>
            where
                T: ?Sized + Serialize,
            {
                self.element(value)
            }

            fn end(self) -> Result<(), Error> {
                self.logger.close()
            }
        }
    )+};
}

#[derive(Debug)]
pub(crate) struct Error(std::io::Error);
impl std::error::Error for Error {}
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
impl serde::ser::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Self(std::io::Error::other(msg.to_string()))
    }
}
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self(e)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Block,
    Row,
}

/// A TOML-like serializer of the reports.
///
/// In a block, each leaf field is a `key = value` line, the keys of nested
/// structs are joined with dots. A row writes the whole value in one line.
/// Absent options are skipped.
pub(crate) struct Logger<W> {
    writer: W,
    path: Vec<&'static str>,
    mode: Mode,
    // Nesting level of sequences and variants
    depth: usize,
    // Nothing is written in the current row yet
    fresh: bool,
    prec: usize,
}

impl<W: Write> Logger<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer, path: Vec::new(), mode: Mode::Block, depth: 0, fresh: true, prec: 4 }
    }

    /// Set the number of decimal places of the floats.
    pub(crate) fn with_prec(self, prec: usize) -> Self {
        Self { prec, ..self }
    }

    pub(crate) fn top_title(&mut self, title: &str) -> std::io::Result<()> {
        writeln!(self.writer, "[{title}]")
    }

    pub(crate) fn title(&mut self, title: &str) -> std::io::Result<()> {
        writeln!(self.writer, "\n[{title}]")
    }

    /// Log a value, one line per field.
    pub(crate) fn log<S: Serialize>(&mut self, s: S) -> std::io::Result<()> {
        s.serialize(&mut *self).map_err(|e| e.0)
    }

    /// Log a value in one line.
    pub(crate) fn row<S: Serialize>(&mut self, s: S) -> std::io::Result<()> {
        self.mode = Mode::Row;
        self.fresh = true;
        let res = s.serialize(&mut *self).map_err(|e| e.0);
        self.mode = Mode::Block;
        res?;
        writeln!(self.writer)
    }

    pub(crate) fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    fn key(&mut self) -> Result<(), Error> {
        if self.depth > 0 {
            return Ok(());
        }
        let path = self.path.join(".");
        match self.mode {
            Mode::Block if path.is_empty() => {}
            Mode::Block => write!(self.writer, "{path} = ")?,
            Mode::Row => {
                if !std::mem::take(&mut self.fresh) {
                    write!(self.writer, ", ")?;
                }
                if !path.is_empty() {
                    write!(self.writer, "{path}=")?;
                }
            }
        }
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), Error> {
        if self.depth == 0 && self.mode == Mode::Block {
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn leaf(&mut self, v: impl std::fmt::Display) -> Result<(), Error> {
        self.key()?;
        write!(self.writer, "{v}")?;
        self.end_line()
    }

    fn float(&mut self, v: f64) -> Result<(), Error> {
        let prec = self.prec;
        self.leaf(format!("{v:.prec$}"))
    }

    fn open(&mut self, head: &str) -> Result<(), Error> {
        self.key()?;
        write!(self.writer, "{head}(")?;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        write!(self.writer, ")")?;
        self.depth -= 1;
        self.end_line()
    }
}

impl<'a, W: Write> Serializer for &'a mut Logger<W> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Seq<'a, W>;
    type SerializeTuple = Seq<'a, W>;
    type SerializeTupleStruct = Seq<'a, W>;
    type SerializeTupleVariant = Seq<'a, W>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = Self;
    type SerializeStructVariant = Impossible<(), Error>;

    impl_leaf_methods!(
        (serialize_bool, bool),
        (serialize_i8, i8),
        (serialize_i16, i16),
        (serialize_i32, i32),
        (serialize_i64, i64),
        (serialize_u8, u8),
        (serialize_u16, u16),
        (serialize_u32, u32),
        (serialize_u64, u64),
        (serialize_char, char),
        (serialize_str, &str),
        (serialize_unit_struct, &'static str),
    );

    fn serialize_f32(self, v: f32) -> Result<Self::Ok, Self::Error> {
        self.float(v.into())
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok, Self::Error> {
        self.float(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        let mut seq = self.serialize_seq(Some(v.len()))?;
        for b in v {
            SerializeSeq::serialize_element(&mut seq, b)?;
        }
        SerializeSeq::end(seq)
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.leaf(variant)
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.open(variant)?;
        value.serialize(&mut *self)?;
        self.close()
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        self.open("")?;
        Ok(Seq { logger: self, first: true })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        self.open(name)?;
        Ok(Seq { logger: self, first: true })
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        self.open(variant)?;
        Ok(Seq { logger: self, first: true })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Err(Error::custom("maps are not supported"))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        if self.depth > 0 {
            return Err(Error::custom(format!("{name} cannot be nested in a sequence")));
        }
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(Error::custom(format!("struct variant {name}::{variant} is not supported")))
    }
}

impl<W: Write> SerializeStruct for &mut Logger<W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.path.push(key);
        let res = value.serialize(&mut **self);
        self.path.pop();
        res
    }

    fn end(self) -> Result<(), Error> {
        Ok(())
    }
}

pub(crate) struct Seq<'a, W> {
    logger: &'a mut Logger<W>,
    first: bool,
}

impl<W: Write> Seq<'_, W> {
    fn element<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        if !std::mem::take(&mut self.first) {
            write!(self.logger.writer, ", ")?;
        }
        value.serialize(&mut *self.logger)
    }
}

impl_seq!(
    (SerializeSeq, serialize_element),
    (SerializeTuple, serialize_element),
    (SerializeTupleStruct, serialize_field),
    (SerializeTupleVariant, serialize_field),
);

#[cfg(test)]
mod tests {
    use super::*;
    use slider_crank::{Driver, Geometry, RateKind, Rates};

    #[derive(serde::Serialize)]
    struct Report {
        name: &'static str,
        geo: Geometry,
        driver: Driver,
        rates: Rates,
        stroke: Option<[f64; 2]>,
        skipped: Option<f64>,
    }

    fn report() -> Report {
        Report {
            name: "demo",
            geo: Geometry::new(1., 3., 0.5),
            driver: Driver::CrankAngle(30.),
            rates: Rates { kind: RateKind::Slider, vel: 2., acc: -1. },
            stroke: Some([2., 4.]),
            skipped: None,
        }
    }

    #[test]
    fn block() {
        let mut buf = Vec::new();
        let mut log = Logger::new(&mut buf).with_prec(2);
        log.top_title("test").unwrap();
        log.title("report").unwrap();
        log.log(report()).unwrap();
        log.flush().unwrap();
        let expected = "\
[test]

[report]
name = demo
geo.lm = 1.00
geo.lb = 3.00
geo.e = 0.50
driver = CrankAngle(30.00)
rates.kind = Slider
rates.vel = 2.00
rates.acc = -1.00
stroke = (2.00, 4.00)
";
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }

    #[test]
    fn rows() {
        let mut buf = Vec::new();
        let mut log = Logger::new(&mut buf).with_prec(1);
        log.row(report()).unwrap();
        log.row(Geometry::new(2., 5., 0.)).unwrap();
        let expected = "\
name=demo, geo.lm=1.0, geo.lb=3.0, geo.e=0.5, driver=CrankAngle(30.0), \
rates.kind=Slider, rates.vel=2.0, rates.acc=-1.0, stroke=(2.0, 4.0)
lm=2.0, lb=5.0, e=0.0
";
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }

    #[test]
    fn unsupported() {
        let mut buf = Vec::new();
        let mut log = Logger::new(&mut buf);
        let map = std::collections::HashMap::from([("a", 1.)]);
        assert!(log.log(map).is_err());
        assert!(log.log([Geometry::default()]).is_err());
    }
}
