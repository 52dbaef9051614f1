//! Patient mapping

use super::{present, Mapper};
use crate::domain::codes::ContactPointSystem;
use crate::domain::ids::ResourceType;
use crate::domain::legacy::{non_empty, LegacyAddress, LegacyContact, LegacyKind, LegacyPatient};
use crate::domain::resources::{
    Address, CodeableConcept, Coding, ContactPoint, HumanName, Identifier, Meta, Patient,
    PatientCommunication,
};
use crate::domain::Result;

const IDENTIFIER_TYPE_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/v2-0203";
const LANGUAGE_SYSTEM: &str = "urn:ietf:bcp:47";

impl Mapper {
    /// Maps a legacy patient to a `Patient`
    ///
    /// Address, telecom, communication and MRN are emitted only when the
    /// legacy record carries the corresponding data.
    pub fn map_patient(&self, legacy: &LegacyPatient) -> Result<Patient> {
        let token = self.id_token(LegacyKind::Patient, &legacy.patient_id)?;

        let mut identifier = vec![self.source_identifier(present(&legacy.patient_id))];
        if let Some(mrn) = non_empty(&legacy.mrn) {
            identifier.push(mrn_identifier(mrn));
        }

        let mut given: Vec<String> = present(&legacy.first_name).into_iter().collect();
        given.extend(present(&legacy.middle_name));

        let name = HumanName {
            name_use: "official".to_string(),
            family: present(&legacy.last_name).unwrap_or_default(),
            given,
        };

        Ok(Patient {
            id: ResourceType::Patient.generated_id(&token),
            meta: Meta::for_type(ResourceType::Patient),
            identifier,
            active: legacy.active.unwrap_or(true),
            name: vec![name],
            gender: self.tables.gender(non_empty(&legacy.gender)),
            birth_date: present(&legacy.birth_date),
            deceased_boolean: legacy.deceased.unwrap_or(false),
            address: legacy.address.as_ref().map(map_address).into_iter().collect(),
            telecom: legacy.contact.as_ref().map(map_telecom).unwrap_or_default(),
            communication: non_empty(&legacy.preferred_language)
                .map(|language| self.map_communication(language))
                .into_iter()
                .collect(),
        })
    }

    fn map_communication(&self, language: &str) -> PatientCommunication {
        PatientCommunication {
            language: CodeableConcept {
                coding: vec![Coding::new(
                    LANGUAGE_SYSTEM,
                    self.tables.language_code(language),
                    language,
                )],
                text: Some(language.to_string()),
            },
            preferred: true,
        }
    }
}

fn mrn_identifier(mrn: &str) -> Identifier {
    Identifier {
        system: IDENTIFIER_TYPE_SYSTEM.to_string(),
        identifier_type: Some(CodeableConcept::coded(Coding::new(
            IDENTIFIER_TYPE_SYSTEM,
            "MR",
            "Medical Record Number",
        ))),
        value: Some(mrn.to_string()),
    }
}

fn map_address(legacy: &LegacyAddress) -> Address {
    let mut line: Vec<String> = present(&legacy.line1).into_iter().collect();
    line.extend(present(&legacy.line2));

    Address {
        address_use: "home".to_string(),
        line,
        city: present(&legacy.city),
        state: present(&legacy.state_code).or_else(|| present(&legacy.state)),
        postal_code: present(&legacy.postal_code),
        country: present(&legacy.country),
    }
}

fn map_telecom(legacy: &LegacyContact) -> Vec<ContactPoint> {
    let mut telecom = Vec::new();

    if let Some(phone) = present(&legacy.phone) {
        telecom.push(ContactPoint {
            system: ContactPointSystem::Phone,
            value: phone,
            contact_use: Some("home".to_string()),
        });
    }
    if let Some(email) = present(&legacy.email) {
        telecom.push(ContactPoint {
            system: ContactPointSystem::Email,
            value: email,
            contact_use: None,
        });
    }

    telecom
}
