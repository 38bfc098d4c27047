//! Sample collection used to populate a fresh database

use serde_json::json;
use tracing::info;

use crate::digimons::DigimonStore;
use crate::entity::digimons;
use crate::error::Result;
use crate::input::DigimonInput;

struct Sample {
    name: &'static str,
    level: &'static str,
    digimon_type: &'static str,
    description: &'static str,
    attack_power: i32,
    defense_value: i32,
}

const SAMPLES: &[Sample] = &[
    Sample {
        name: "Agumon",
        level: "Rookie",
        digimon_type: "Vaccine",
        description: "A small dinosaur Digimon with great potential. It has a brave heart and never gives up.",
        attack_power: 120,
        defense_value: 90,
    },
    Sample {
        name: "Gabumon",
        level: "Rookie",
        digimon_type: "Data",
        description: "A shy but loyal wolf-like Digimon. It wears the pelt of another Digimon.",
        attack_power: 110,
        defense_value: 100,
    },
    Sample {
        name: "Greymon",
        level: "Champion",
        digimon_type: "Vaccine",
        description: "The evolved form of Agumon. A powerful dinosaur Digimon with great strength.",
        attack_power: 180,
        defense_value: 140,
    },
    Sample {
        name: "Patamon",
        level: "Rookie",
        digimon_type: "Data",
        description: "A small, cute mammal Digimon with wings. Despite its appearance, it's quite powerful.",
        attack_power: 95,
        defense_value: 85,
    },
    Sample {
        name: "Devimon",
        level: "Champion",
        digimon_type: "Virus",
        description: "A fallen angel Digimon with dark powers. It spreads evil wherever it goes.",
        attack_power: 170,
        defense_value: 120,
    },
    Sample {
        name: "Tentomon",
        level: "Rookie",
        digimon_type: "Vaccine",
        description: "An insect Digimon with high intelligence and curiosity about everything.",
        attack_power: 105,
        defense_value: 95,
    },
];

/// Replace the whole collection with the sample records.
/// Runs in one transaction, so a failure leaves the old records in place.
pub async fn seed_sample_data(store: &DigimonStore) -> Result<Vec<digimons::Model>> {
    info!("Seeding database...");

    let inputs: Vec<DigimonInput> = SAMPLES
        .iter()
        .map(|sample| {
            DigimonInput::from_json(&json!({
                "name": sample.name,
                "level": sample.level,
                "type": sample.digimon_type,
                "description": sample.description,
                "attackPower": sample.attack_power,
                "defenseValue": sample.defense_value,
            }))
        })
        .collect();

    let created = store.replace_all(&inputs).await?;
    for record in &created {
        info!("Created: {}", record.name);
    }

    info!("Seed data created successfully ({} records)", created.len());
    Ok(created)
}
