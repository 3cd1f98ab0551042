//! Step catalogs for the two five-step wizards.
//!
//! The frontend renders instructions and quotes itself; the backend only
//! needs to know which record field each step fills, how it is entered and
//! whether the step starts a timer session.

use serde::Serialize;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepInput {
    Number,
    Textarea,
    Date,
    /// Read-only preview of the generated statement
    Preview,
    Signature,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardStep {
    pub number: u8,
    pub title: &'static str,
    /// Record field filled by this step
    pub field: &'static str,
    pub input: StepInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<&'static str>,
}

pub const AFFIRMATION_STEPS: &[WizardStep] = &[
    WizardStep {
        number: 1,
        title: "Det exakta beloppet",
        field: "amount",
        input: StepInput::Number,
        timer_minutes: None,
        suffix: Some("SEK"),
    },
    WizardStep {
        number: 2,
        title: "Vad du ger i utbyte",
        field: "exchange",
        input: StepInput::Textarea,
        timer_minutes: None,
        suffix: None,
    },
    WizardStep {
        number: 3,
        title: "Din deadline",
        field: "deadline",
        input: StepInput::Date,
        timer_minutes: None,
        suffix: None,
    },
    WizardStep {
        number: 4,
        title: "Din plan",
        field: "plan",
        input: StepInput::Textarea,
        timer_minutes: None,
        suffix: None,
    },
    WizardStep {
        number: 5,
        title: "Ditt uttalande",
        field: "statement",
        input: StepInput::Preview,
        timer_minutes: None,
        suffix: None,
    },
];

pub const PLEDGE_STEPS: &[WizardStep] = &[
    WizardStep {
        number: 1,
        title: "Jag har kraften att lyckas",
        field: "principle_1",
        input: StepInput::Textarea,
        timer_minutes: None,
        suffix: None,
    },
    WizardStep {
        number: 2,
        title: "Mina tankar blir min verklighet",
        field: "principle_2",
        input: StepInput::Textarea,
        timer_minutes: Some(30),
        suffix: None,
    },
    WizardStep {
        number: 3,
        title: "Mina önskemål skapar möjligheter",
        field: "principle_3",
        input: StepInput::Textarea,
        timer_minutes: Some(10),
        suffix: None,
    },
    WizardStep {
        number: 4,
        title: "Jag har ett tydligt mål",
        field: "principle_4",
        input: StepInput::Textarea,
        timer_minutes: None,
        suffix: None,
    },
    WizardStep {
        number: 5,
        title: "Min framgång bygger på integritet",
        field: "signature",
        input: StepInput::Signature,
        timer_minutes: None,
        suffix: None,
    },
];

/// Look up a step by its 1-based number
pub fn find_step(steps: &'static [WizardStep], number: u8) -> Result<&'static WizardStep, ValidationError> {
    steps
        .iter()
        .find(|step| step.number == number)
        .ok_or(ValidationError::UnknownStep(number))
}
