//! Fixed FHIR code enumerations
//!
//! Each enumeration here is the closed value set for one coded element. The
//! mapper emits these types, so its output can only carry legal codes, and the
//! validator reads [`WireCode::wire_values`] to check resources that arrive as
//! raw JSON.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Common surface of every wire-coded enumeration
pub trait WireCode: Sized + Copy + 'static {
    /// Every member, in value-set order
    const ALL: &'static [Self];

    /// Wire representation of this code
    fn as_str(&self) -> &'static str;

    /// Parses a wire string, returning `None` outside the value set
    fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }

    /// Wire strings of every member
    fn wire_values() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl WireCode for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as WireCode>::from_wire(s).ok_or_else(|| {
                    format!(
                        "Invalid {}: {}. Must be one of: {}",
                        stringify!($name),
                        s,
                        <Self as WireCode>::wire_values().join(", ")
                    )
                })
            }
        }
    };
}

wire_enum! {
    /// Patient.gender
    AdministrativeGender {
        Male => "male",
        Female => "female",
        Other => "other",
        Unknown => "unknown",
    }
}

wire_enum! {
    /// Encounter.status (FHIR R4)
    EncounterStatus {
        Planned => "planned",
        Arrived => "arrived",
        Triaged => "triaged",
        InProgress => "in-progress",
        OnLeave => "onleave",
        Finished => "finished",
        Cancelled => "cancelled",
        EnteredInError => "entered-in-error",
        Unknown => "unknown",
    }
}

wire_enum! {
    /// Observation.status
    ObservationStatus {
        Registered => "registered",
        Preliminary => "preliminary",
        Final => "final",
        Amended => "amended",
        Corrected => "corrected",
        Cancelled => "cancelled",
        EnteredInError => "entered-in-error",
        Unknown => "unknown",
    }
}

wire_enum! {
    /// MedicationRequest.status
    MedicationRequestStatus {
        Active => "active",
        OnHold => "on-hold",
        Cancelled => "cancelled",
        Completed => "completed",
        EnteredInError => "entered-in-error",
        Stopped => "stopped",
        Draft => "draft",
        Unknown => "unknown",
    }
}

wire_enum! {
    /// MedicationRequest.intent
    MedicationRequestIntent {
        Proposal => "proposal",
        Plan => "plan",
        Order => "order",
        OriginalOrder => "original-order",
        ReflexOrder => "reflex-order",
        FillerOrder => "filler-order",
        InstanceOrder => "instance-order",
        Option => "option",
    }
}

wire_enum! {
    /// ContactPoint.system
    ContactPointSystem {
        Phone => "phone",
        Fax => "fax",
        Email => "email",
        Pager => "pager",
        Url => "url",
        Sms => "sms",
        Other => "other",
    }
}

wire_enum! {
    /// v3-ActCode subset used for Encounter.class
    EncounterClass {
        /// Ambulatory
        Ambulatory => "AMB",
        /// Inpatient
        Inpatient => "IMP",
        /// Emergency
        Emergency => "EMER",
        /// Short stay
        ShortStay => "SS",
        /// Virtual
        Virtual => "VR",
        /// Home health
        HomeHealth => "HH",
        /// Non-acute inpatient
        NonAcute => "NONAC",
    }
}

wire_enum! {
    /// v3-ObservationInterpretation subset used for lab flags
    Interpretation {
        High => "H",
        Low => "L",
        Abnormal => "A",
        Normal => "N",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_round_trip() {
        for status in EncounterStatus::ALL {
            assert_eq!(
                EncounterStatus::from_wire(status.as_str()),
                Some(*status)
            );
        }
        assert_eq!(EncounterStatus::OnLeave.as_str(), "onleave");
        assert_eq!(EncounterStatus::InProgress.as_str(), "in-progress");
    }

    #[test]
    fn test_serde_uses_wire_strings() {
        let json = serde_json::to_string(&MedicationRequestStatus::OnHold).unwrap();
        assert_eq!(json, "\"on-hold\"");

        let parsed: EncounterClass = serde_json::from_str("\"EMER\"").unwrap();
        assert_eq!(parsed, EncounterClass::Emergency);
    }

    #[test]
    fn test_from_str_error_lists_value_set() {
        let err = AdministrativeGender::from_str("M").unwrap_err();
        assert_eq!(
            err,
            "Invalid AdministrativeGender: M. Must be one of: male, female, other, unknown"
        );
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(
            MedicationRequestIntent::wire_values(),
            vec![
                "proposal",
                "plan",
                "order",
                "original-order",
                "reflex-order",
                "filler-order",
                "instance-order",
                "option"
            ]
        );
        assert_eq!(ContactPointSystem::ALL.len(), 7);
    }
}
