//! BMI classifier
//!
//! Maps weight/height/age/gender to a BMI value, a category label, a
//! traffic-light status and a static recommendation. Each age band (and,
//! for children, each age/gender sub-band) is an ordered table of
//! exclusive upper bounds resolved by linear scan.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const INVALID_AGE: &str = "Invalid Age";
const INVALID_AGE_ADVICE: &str = "Age must be 2 years or older for BMI calculation.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MALE" | "M" => Ok(Gender::Male),
            "FEMALE" | "F" => Ok(Gender::Female),
            _ => Err(ValidationError::UnknownGender(s.to_string())),
        }
    }
}

/// Traffic-light severity. Ordered: `Ok < Caution < NotOk`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BmiStatus {
    Ok,
    Caution,
    NotOk,
}

impl BmiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BmiStatus::Ok => "OK",
            BmiStatus::Caution => "CAUTION",
            BmiStatus::NotOk => "NOT_OK",
        }
    }
}

impl fmt::Display for BmiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BmiStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(BmiStatus::Ok),
            "CAUTION" => Ok(BmiStatus::Caution),
            "NOT_OK" => Ok(BmiStatus::NotOk),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

/// Life-stage grouping that selects the threshold table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBand {
    /// 2-17
    Child,
    /// 18-64
    Adult,
    /// 65-150
    Elderly,
}

impl AgeBand {
    pub fn from_age(age_years: u32) -> Option<Self> {
        match age_years {
            2..=17 => Some(AgeBand::Child),
            18..=64 => Some(AgeBand::Adult),
            65..=150 => Some(AgeBand::Elderly),
            _ => None,
        }
    }
}

/// Validated classifier input
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BmiInput {
    pub weight_kg: f64,
    pub height_m: f64,
    pub age_years: u32,
    pub gender: Gender,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BmiResult {
    pub bmi_value: f64,
    pub category: &'static str,
    pub status: BmiStatus,
    pub recommendation: &'static str,
}

/// One row of a threshold table: applies to every BMI below `upper`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiBand {
    pub upper: f64,
    pub category: &'static str,
    pub status: BmiStatus,
    pub recommendation: &'static str,
}

impl BmiBand {
    const fn new(
        upper: f64,
        category: &'static str,
        status: BmiStatus,
        recommendation: &'static str,
    ) -> Self {
        Self { upper, category, status, recommendation }
    }
}

pub const ADULT_TABLE: &[BmiBand] = &[
    BmiBand::new(
        18.5,
        "Underweight",
        BmiStatus::NotOk,
        "Consider consulting a healthcare provider. Focus on healthy weight gain through balanced nutrition and strength training.",
    ),
    BmiBand::new(
        25.0,
        "Normal",
        BmiStatus::Ok,
        "Great job! Maintain your current lifestyle with regular exercise and balanced nutrition.",
    ),
    BmiBand::new(
        30.0,
        "Overweight",
        BmiStatus::Caution,
        "Consider increasing physical activity and reviewing your diet. Small changes can make a big difference.",
    ),
    BmiBand::new(
        35.0,
        "Obesity Class I",
        BmiStatus::NotOk,
        "Consult with a healthcare provider for a personalized weight management plan. Focus on gradual lifestyle changes.",
    ),
    BmiBand::new(
        40.0,
        "Obesity Class II",
        BmiStatus::NotOk,
        "Medical supervision recommended. Consider comprehensive weight management program with professional guidance.",
    ),
    BmiBand::new(
        f64::INFINITY,
        "Obesity Class III",
        BmiStatus::NotOk,
        "Immediate medical attention recommended. Consult with healthcare professionals for comprehensive treatment options.",
    ),
];

pub const ELDERLY_TABLE: &[BmiBand] = &[
    BmiBand::new(
        18.5,
        "Underweight",
        BmiStatus::NotOk,
        "Consult with a healthcare provider. Adequate nutrition is especially important for seniors.",
    ),
    BmiBand::new(
        23.0,
        "Slightly Low",
        BmiStatus::Caution,
        "Monitor weight regularly. Consider increasing protein intake and gentle strength exercises.",
    ),
    BmiBand::new(
        30.0,
        "Normal/Slightly High",
        BmiStatus::Ok,
        "Excellent! Continue with regular gentle exercise and balanced nutrition appropriate for your age.",
    ),
    BmiBand::new(
        f64::INFINITY,
        "Obese",
        BmiStatus::NotOk,
        "Consult with healthcare provider. Focus on gentle, age-appropriate exercise and nutrition modifications.",
    ),
];

/// Child thresholds for one age/gender sub-band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildThresholds {
    pub underweight: f64,
    pub overweight: f64,
    pub obese: f64,
}

impl ChildThresholds {
    /// Thresholds for ages 2-17; `None` outside the child band
    pub fn for_age(age_years: u32, gender: Gender) -> Option<Self> {
        let male = gender == Gender::Male;
        let (underweight, overweight, obese) = match age_years {
            2..=5 => (14.0, 17.5, 19.0),
            6..=11 => (15.0, if male { 20.0 } else { 19.5 }, if male { 23.0 } else { 22.5 }),
            12..=17 => (
                if male { 17.0 } else { 16.5 },
                if male { 24.0 } else { 23.5 },
                if male { 28.0 } else { 27.0 },
            ),
            _ => return None,
        };
        Some(Self { underweight, overweight, obese })
    }

    pub fn table(&self) -> [BmiBand; 4] {
        [
            BmiBand::new(
                self.underweight,
                "Underweight",
                BmiStatus::NotOk,
                "Consult with a pediatrician. Ensure adequate nutrition for healthy growth and development.",
            ),
            BmiBand::new(
                self.overweight,
                "Healthy Weight",
                BmiStatus::Ok,
                "Great! Maintain healthy eating habits and stay active with age-appropriate activities.",
            ),
            BmiBand::new(
                self.obese,
                "Overweight",
                BmiStatus::Caution,
                "Consult with a pediatrician. Focus on healthy family meals and increased physical activity.",
            ),
            BmiBand::new(
                f64::INFINITY,
                "Obese",
                BmiStatus::NotOk,
                "Medical evaluation recommended. Work with healthcare providers on family-based lifestyle changes.",
            ),
        ]
    }
}

/// Round half-up to two decimal places.
///
/// Works on the shortest decimal form of `value` rather than on
/// `value * 100.0`, so 1.005 rounds to 1.01 the way fixed-point does.
pub fn round2(value: f64) -> f64 {
    let text = value.abs().to_string();
    let Some((whole, fraction)) = text.split_once('.') else {
        // integral, infinite or NaN
        return value;
    };
    if fraction.len() <= 2 {
        return value;
    }
    let (Ok(whole), Ok(cents)) = (whole.parse::<u64>(), fraction[..2].parse::<u64>()) else {
        return value;
    };
    let round_up = u64::from(fraction.as_bytes()[2] >= b'5');
    let hundredths = whole * 100 + cents + round_up;
    (hundredths as f64 / 100.0).copysign(value)
}

/// BMI = weight (kg) / height (m)², rounded to 2 places.
///
/// `height_m` must be positive; callers validate before calling.
pub fn calculate_bmi(weight_kg: f64, height_m: f64) -> f64 {
    round2(weight_kg / (height_m * height_m))
}

/// First band whose exclusive upper bound lies above `bmi`.
/// Tables always end in an unbounded band, which also absorbs NaN.
fn resolve(table: &[BmiBand], bmi: f64) -> BmiBand {
    table
        .iter()
        .find(|band| bmi < band.upper)
        .copied()
        .unwrap_or(table[table.len() - 1])
}

/// Classify an already computed BMI value. Never fails: ages outside
/// every band produce the "Invalid Age" result.
pub fn classify(bmi_value: f64, age_years: u32, gender: Gender) -> BmiResult {
    let band = match AgeBand::from_age(age_years) {
        Some(AgeBand::Adult) => resolve(ADULT_TABLE, bmi_value),
        Some(AgeBand::Elderly) => resolve(ELDERLY_TABLE, bmi_value),
        Some(AgeBand::Child) => match ChildThresholds::for_age(age_years, gender) {
            Some(thresholds) => resolve(&thresholds.table(), bmi_value),
            None => return invalid_age(bmi_value),
        },
        None => return invalid_age(bmi_value),
    };

    BmiResult {
        bmi_value,
        category: band.category,
        status: band.status,
        recommendation: band.recommendation,
    }
}

fn invalid_age(bmi_value: f64) -> BmiResult {
    BmiResult {
        bmi_value,
        category: INVALID_AGE,
        status: BmiStatus::NotOk,
        recommendation: INVALID_AGE_ADVICE,
    }
}

/// Calculate and classify in one step
pub fn assess(input: &BmiInput) -> BmiResult {
    let bmi = calculate_bmi(input.weight_kg, input.height_m);
    classify(bmi, input.age_years, input.gender)
}
