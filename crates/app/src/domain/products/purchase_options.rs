//! Purchase Options

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a product is bought. Part of a cart line's identity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOption {
    #[default]
    Standard,
    Express,
    Premium,
    Bundle,
    Warranty,
    Bulk,
    Subscription,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown purchase option: {0}")]
pub struct UnknownPurchaseOption(pub String);

impl PurchaseOption {
    pub const ALL: [Self; 7] = [
        Self::Standard,
        Self::Express,
        Self::Premium,
        Self::Bundle,
        Self::Warranty,
        Self::Bulk,
        Self::Subscription,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Premium => "premium",
            Self::Bundle => "bundle",
            Self::Warranty => "warranty",
            Self::Bulk => "bulk",
            Self::Subscription => "subscription",
        }
    }
}

impl Display for PurchaseOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PurchaseOption {
    type Err = UnknownPurchaseOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str() == value)
            .ok_or_else(|| UnknownPurchaseOption(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_option_parses_from_its_own_name() {
        for option in PurchaseOption::ALL {
            assert_eq!(option.as_str().parse::<PurchaseOption>(), Ok(option));
        }
    }

    #[test]
    fn unknown_option_is_rejected() {
        assert_eq!(
            "overnight".parse::<PurchaseOption>(),
            Err(UnknownPurchaseOption("overnight".to_string()))
        );
    }

    #[test]
    fn default_is_standard() {
        assert_eq!(PurchaseOption::default(), PurchaseOption::Standard);
    }
}
