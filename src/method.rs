use crate::error::{NoisewireError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Redundancy scheme carried in the method field of a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Method {
    #[serde(rename = "PARITY")]
    Parity,
    #[serde(rename = "2DPAR")]
    TwoDParity,
    #[default]
    #[serde(rename = "CRC16")]
    Crc16,
    #[serde(rename = "HAMMING")]
    Hamming,
    #[serde(rename = "CHECKSUM")]
    Checksum,
}

impl Method {
    /// All methods, in menu order (1-5)
    pub const ALL: [Method; 5] = [
        Method::Parity,
        Method::TwoDParity,
        Method::Crc16,
        Method::Hamming,
        Method::Checksum,
    ];

    /// Tag written on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Parity => "PARITY",
            Method::TwoDParity => "2DPAR",
            Method::Crc16 => "CRC16",
            Method::Hamming => "HAMMING",
            Method::Checksum => "CHECKSUM",
        }
    }

    /// Look up a method by its interactive menu number
    pub fn from_choice(choice: u8) -> Result<Self> {
        match choice {
            1..=5 => Ok(Self::ALL[usize::from(choice) - 1]),
            other => Err(NoisewireError::UnknownMethod(other.to_string())),
        }
    }

    /// Parse a wire tag exactly as transmitted
    pub fn from_tag(tag: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == tag)
            .ok_or_else(|| NoisewireError::UnknownMethod(tag.to_string()))
    }

    /// Number of redundancy bytes produced for a payload of `payload_len` bytes
    pub fn redundancy_len(&self, payload_len: usize) -> usize {
        match self {
            Method::Parity => payload_len,
            Method::TwoDParity => payload_len.div_ceil(8) + 1,
            Method::Crc16 | Method::Checksum => 2,
            Method::Hamming => payload_len * 2,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient parse for command-line use: any case, or the menu number
impl std::str::FromStr for Method {
    type Err = NoisewireError;
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(choice) = trimmed.parse::<u8>() {
            return Self::from_choice(choice);
        }
        match trimmed.to_uppercase().as_str() {
            "PARITY" => Ok(Self::Parity),
            "2DPAR" | "2DPARITY" => Ok(Self::TwoDParity),
            "CRC16" | "CRC" => Ok(Self::Crc16),
            "HAMMING" => Ok(Self::Hamming),
            "CHECKSUM" => Ok(Self::Checksum),
            _ => Err(NoisewireError::UnknownMethod(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_roundtrip() {
        for method in Method::ALL {
            assert_eq!(Method::from_tag(method.as_str()).unwrap(), method);
            assert_eq!(method.to_string(), method.as_str());
        }
    }

    #[test]
    fn test_from_tag_is_exact() {
        assert!(Method::from_tag("crc16").is_err());
        assert!(Method::from_tag("CRC16 ").is_err());
        assert!(matches!(
            Method::from_tag("CRC32"),
            Err(NoisewireError::UnknownMethod(tag)) if tag == "CRC32"
        ));
    }

    #[test]
    fn test_menu_choices() {
        assert_eq!(Method::from_choice(1).unwrap(), Method::Parity);
        assert_eq!(Method::from_choice(2).unwrap(), Method::TwoDParity);
        assert_eq!(Method::from_choice(3).unwrap(), Method::Crc16);
        assert_eq!(Method::from_choice(4).unwrap(), Method::Hamming);
        assert_eq!(Method::from_choice(5).unwrap(), Method::Checksum);
        assert!(Method::from_choice(0).is_err());
        assert!(Method::from_choice(6).is_err());
    }

    #[test]
    fn test_lenient_parse() {
        assert_eq!("hamming".parse::<Method>().unwrap(), Method::Hamming);
        assert_eq!("2dpar".parse::<Method>().unwrap(), Method::TwoDParity);
        assert_eq!("5".parse::<Method>().unwrap(), Method::Checksum);
        assert!("7".parse::<Method>().is_err());
        assert!("md5".parse::<Method>().is_err());
    }

    #[test]
    fn test_redundancy_len() {
        assert_eq!(Method::Parity.redundancy_len(5), 5);
        assert_eq!(Method::TwoDParity.redundancy_len(0), 1);
        assert_eq!(Method::TwoDParity.redundancy_len(8), 2);
        assert_eq!(Method::TwoDParity.redundancy_len(9), 3);
        assert_eq!(Method::Crc16.redundancy_len(100), 2);
        assert_eq!(Method::Hamming.redundancy_len(3), 6);
        assert_eq!(Method::Checksum.redundancy_len(0), 2);
    }

    #[test]
    fn test_serde_uses_wire_tags() {
        let json = serde_json::to_string(&Method::TwoDParity).unwrap();
        assert_eq!(json, "\"2DPAR\"");
        let back: Method = serde_json::from_str("\"CHECKSUM\"").unwrap();
        assert_eq!(back, Method::Checksum);
    }
}
