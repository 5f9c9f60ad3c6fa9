use serde::{de::Visitor, Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

pub trait Entity {
    fn id(&self) -> &ID;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ID(Uuid);

impl ID {
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }

    pub fn inner_ref(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ID {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for ID {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Display for ID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

#[derive(Error, Debug)]
pub enum InvalidIDError {
    #[error("ID: {0} is malformed")]
    Malformed(String),
}

impl FromStr for ID {
    type Err = InvalidIDError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| InvalidIDError::Malformed(s.to_string()))
    }
}

impl Serialize for ID {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_string())
    }
}

impl<'de> Deserialize<'de> for ID {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct IDVisitor;

        impl<'de> Visitor<'de> for IDVisitor {
            type Value = ID;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A valid string id representation")
            }

            fn visit_str<E>(self, value: &str) -> Result<ID, E>
            where
                E: serde::de::Error,
            {
                value
                    .parse::<ID>()
                    .map_err(|_| E::custom(format!("Malformed id: {}", value)))
            }
        }

        deserializer.deserialize_str(IDVisitor)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_its_own_string_representation() {
        let id = ID::default();
        assert_eq!(id.to_string().parse::<ID>().unwrap(), id);
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!("".parse::<ID>().is_err());
        assert!("123".parse::<ID>().is_err());
        assert!("not-a-uuid-at-all-not-a-uuid-at-all".parse::<ID>().is_err());
    }

    #[test]
    fn deserializes_from_json_string() {
        let id = ID::default();
        let json = format!("\"{}\"", id);
        let parsed: ID = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<ID>("\"nope\"").is_err());
    }
}
