//! Integration method selectors and run settings.
//!
//! The string names accepted by `FromStr` are the same ones used by the
//! serde representation: "Euler", "RK2", "RK4", "SE", "SV".

use crate::error::IntegrationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Explicit schemes for a generic first-order system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Euler,
    #[serde(rename = "RK2")]
    Rk2,
    #[serde(rename = "RK4")]
    Rk4,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Euler, Method::Rk2, Method::Rk4];

    pub fn name(self) -> &'static str {
        match self {
            Method::Euler => "Euler",
            Method::Rk2 => "RK2",
            Method::Rk4 => "RK4",
        }
    }

    /// Global order of accuracy.
    pub fn order(self) -> u32 {
        match self {
            Method::Euler => 1,
            Method::Rk2 => 2,
            Method::Rk4 => 4,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = IntegrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| IntegrationError::UnknownMethod(s.to_string()))
    }
}

/// Schemes for systems in canonical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HamiltonianMethod {
    Euler,
    #[serde(rename = "RK2")]
    Rk2,
    #[serde(rename = "RK4")]
    Rk4,
    #[serde(rename = "SE")]
    SymplecticEuler,
    #[serde(rename = "SV")]
    StormerVerlet,
}

impl HamiltonianMethod {
    pub const ALL: [HamiltonianMethod; 5] = [
        HamiltonianMethod::Euler,
        HamiltonianMethod::Rk2,
        HamiltonianMethod::Rk4,
        HamiltonianMethod::SymplecticEuler,
        HamiltonianMethod::StormerVerlet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HamiltonianMethod::Euler => "Euler",
            HamiltonianMethod::Rk2 => "RK2",
            HamiltonianMethod::Rk4 => "RK4",
            HamiltonianMethod::SymplecticEuler => "SE",
            HamiltonianMethod::StormerVerlet => "SV",
        }
    }

    pub fn order(self) -> u32 {
        match self {
            HamiltonianMethod::Euler | HamiltonianMethod::SymplecticEuler => 1,
            HamiltonianMethod::Rk2 | HamiltonianMethod::StormerVerlet => 2,
            HamiltonianMethod::Rk4 => 4,
        }
    }

    /// Whether the scheme preserves the symplectic structure (bounded energy error).
    pub fn is_symplectic(self) -> bool {
        matches!(
            self,
            HamiltonianMethod::SymplecticEuler | HamiltonianMethod::StormerVerlet
        )
    }
}

impl fmt::Display for HamiltonianMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HamiltonianMethod {
    type Err = IntegrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HamiltonianMethod::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| IntegrationError::UnknownMethod(s.to_string()))
    }
}

impl From<Method> for HamiltonianMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Euler => HamiltonianMethod::Euler,
            Method::Rk2 => HamiltonianMethod::Rk2,
            Method::Rk4 => HamiltonianMethod::Rk4,
        }
    }
}

/// A complete fixed-step run description for a generic system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegratorSettings {
    pub method: Method,
    pub step_size: f64,
    pub steps: usize,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            method: Method::Euler,
            step_size: 0.1,
            steps: 100,
        }
    }
}

/// A complete fixed-step run description for a Hamiltonian system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianSettings {
    pub method: HamiltonianMethod,
    pub step_size: f64,
    pub steps: usize,
}

impl Default for HamiltonianSettings {
    fn default() -> Self {
        Self {
            method: HamiltonianMethod::Euler,
            step_size: 0.1,
            steps: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HamiltonianMethod, HamiltonianSettings, IntegratorSettings, Method};
    use crate::error::IntegrationError;

    #[test]
    fn parses_every_known_name() {
        for method in Method::ALL {
            assert_eq!(method.name().parse::<Method>(), Ok(method));
        }
        for method in HamiltonianMethod::ALL {
            assert_eq!(method.name().parse::<HamiltonianMethod>(), Ok(method));
        }
    }

    #[test]
    fn rejects_unknown_and_hamiltonian_only_names() {
        assert_eq!(
            "bogus".parse::<Method>(),
            Err(IntegrationError::UnknownMethod("bogus".into()))
        );
        assert!("SV".parse::<Method>().is_err());
        assert!("rk4".parse::<HamiltonianMethod>().is_err());

        let message = "bogus".parse::<HamiltonianMethod>().unwrap_err().to_string();
        assert!(message.contains("unknown integration method"));
    }

    #[test]
    fn serde_names_match_parse_names() {
        assert_eq!(serde_json::to_string(&Method::Rk2).unwrap(), "\"RK2\"");
        assert_eq!(
            serde_json::to_string(&HamiltonianMethod::StormerVerlet).unwrap(),
            "\"SV\""
        );
        let method: HamiltonianMethod = serde_json::from_str("\"SE\"").unwrap();
        assert_eq!(method, HamiltonianMethod::SymplecticEuler);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings: IntegratorSettings =
            serde_json::from_str(r#"{"method":"RK4","step_size":0.05,"steps":20}"#).unwrap();
        assert_eq!(settings.method, Method::Rk4);
        assert_eq!(settings.steps, 20);

        let defaults = HamiltonianSettings::default();
        assert_eq!(defaults.method, HamiltonianMethod::Euler);
        assert_eq!(defaults.steps, 100);
    }

    #[test]
    fn symplectic_flags_and_orders() {
        assert!(HamiltonianMethod::StormerVerlet.is_symplectic());
        assert!(!HamiltonianMethod::Rk4.is_symplectic());
        assert_eq!(HamiltonianMethod::from(Method::Rk2).order(), 2);
        assert_eq!(Method::Rk4.to_string(), "RK4");
    }
}
