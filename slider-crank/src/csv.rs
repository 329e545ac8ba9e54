//! Functions for reading/writing CSV format.
use crate::State;
pub use csv::Error;
use csv::{ReaderBuilder, Writer};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::Cursor;

/// A flat row of a [`State`], angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Default, Deserialize, Serialize)]
pub struct Record {
    /// Crank angle (degrees)
    pub theta_m: f64,
    /// Coupler angle (degrees)
    pub theta_b: f64,
    /// Slider position
    pub s: f64,
    /// Crank angular velocity (rad/s)
    pub omega_m: f64,
    /// Coupler angular velocity (rad/s)
    pub omega_b: f64,
    /// Slider velocity
    pub s_dot: f64,
    /// Crank angular acceleration (rad/s²)
    pub alpha_m: f64,
    /// Coupler angular acceleration (rad/s²)
    pub alpha_b: f64,
    /// Slider acceleration
    pub s_ddot: f64,
}

impl From<&State> for Record {
    fn from(st: &State) -> Self {
        Self {
            theta_m: st.pose.theta_m_deg(),
            theta_b: st.pose.theta_b_deg(),
            s: st.pose.s,
            omega_m: st.vel.omega_m,
            omega_b: st.vel.omega_b,
            s_dot: st.vel.s_dot,
            alpha_m: st.acc.alpha_m,
            alpha_b: st.acc.alpha_b,
            s_ddot: st.acc.s_ddot,
        }
    }
}

/// Parse CSV from string.
///
/// Lines starting with `#` are comments; a header row is expected.
pub fn parse_csv<D>(s: &str) -> Result<Vec<D>, Error>
where
    D: DeserializeOwned,
{
    ReaderBuilder::new()
        .comment(Some(b'#'))
        .from_reader(Cursor::new(s))
        .deserialize()
        .collect()
}

/// Dump CSV to string, with a header row.
pub fn dump_csv<'a, C, S>(c: C) -> Result<String, Box<dyn std::error::Error>>
where
    C: Into<std::borrow::Cow<'a, [S]>>,
    S: Serialize + Clone + 'a,
{
    let mut w = Writer::from_writer(Vec::new());
    let v = c.into().into_owned();
    v.into_iter().try_for_each(|c| w.serialize(c))?;
    Ok(String::from_utf8(w.into_inner()?)?)
}

/// Dump sampled states to CSV.
pub fn dump_states(states: &[State]) -> Result<String, Box<dyn std::error::Error>> {
    dump_csv(states.iter().map(Record::from).collect::<Vec<_>>())
}

#[test]
fn dump_and_parse() {
    use crate::{sweep, Geometry};

    let states = sweep(&Geometry::new(1., 3., 0.5), 2., 0., 12);
    let s = dump_states(&states).unwrap();
    assert!(s.starts_with("theta_m,theta_b,s,omega_m"));
    let records = parse_csv::<Record>(&s).unwrap();
    assert_eq!(records.len(), 12);
    assert_eq!(records[3], Record::from(&states[3]));
}
