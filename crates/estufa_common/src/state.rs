//! Greenhouse state record
//!
//! The single telemetry snapshot the simulator owns and mutates each cycle.
//! Field names on the wire are the Portuguese keys the receiving API expects.

use serde::{Deserialize, Serialize};

use crate::walk::{
    AIR_HUMIDITY, AIR_TEMPERATURE, LUMINOSITY, NUTRIENTS, WATER_PH, WATER_TEMPERATURE,
};

/// Default greenhouse identifier
pub const DEFAULT_ESTUFA_ID: &str = "1";

/// Sensor and actuator readings for one greenhouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreenhouseState {
    #[serde(rename = "estufa_id")]
    pub greenhouse_id: String,

    /// Air temperature in °C
    #[serde(rename = "temperatura_ar")]
    pub air_temperature: f64,

    /// Nutrient solution temperature in °C
    #[serde(rename = "temperatura_agua")]
    pub water_temperature: f64,

    /// Relative air humidity in %
    #[serde(rename = "umidade_ar")]
    pub air_humidity: f64,

    /// Light level in %
    #[serde(rename = "luminosidade")]
    pub luminosity: f64,

    #[serde(rename = "ph_agua")]
    pub water_ph: f64,

    /// Nutrient concentration (ppm)
    #[serde(rename = "nutrientes")]
    pub nutrients: i64,

    #[serde(rename = "ventilacao", with = "flag")]
    pub ventilation: bool,

    #[serde(rename = "iluminacao", with = "flag")]
    pub lighting: bool,

    #[serde(rename = "bomba_agua", with = "flag")]
    pub water_pump: bool,
}

impl GreenhouseState {
    /// Starting readings for a freshly booted greenhouse
    pub fn initial(greenhouse_id: impl Into<String>) -> Self {
        Self {
            greenhouse_id: greenhouse_id.into(),
            air_temperature: 25.0,
            water_temperature: 22.0,
            air_humidity: 65.0,
            luminosity: 70.0,
            water_ph: 6.5,
            nutrients: 400,
            ventilation: true,
            lighting: true,
            water_pump: true,
        }
    }

    /// True if every bounded reading sits inside its closed interval
    pub fn within_bounds(&self) -> bool {
        AIR_TEMPERATURE.contains(self.air_temperature)
            && WATER_TEMPERATURE.contains(self.water_temperature)
            && AIR_HUMIDITY.contains(self.air_humidity)
            && LUMINOSITY.contains(self.luminosity)
            && WATER_PH.contains(self.water_ph)
            && NUTRIENTS.contains(self.nutrients)
    }

    /// Serialize to the JSON body sent to the endpoint
    pub fn to_payload(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Default for GreenhouseState {
    fn default() -> Self {
        Self::initial(DEFAULT_ESTUFA_ID)
    }
}

/// Booleans travel as the integers 0 and 1.
mod flag {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(D::Error::custom(format!("expected 0 or 1, got {}", other))),
        }
    }
}
