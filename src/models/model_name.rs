//! Model names accepted by the models endpoint.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};
use utoipa::ToSchema;

use crate::validation::tagged;

/// Known model architectures. Parsing is exact and case-sensitive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
    ToSchema,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
#[strum(serialize_all = "lowercase")]
pub enum ModelName {
    /// AlexNet.
    Alexnet,
    /// ResNet.
    Resnet,
    /// LeNet.
    Lenet,
}

impl ModelName {
    /// Canned message for this model.
    pub fn message(&self) -> &'static str {
        match self {
            ModelName::Alexnet => "Deep Learning FTW!",
            ModelName::Lenet => "LeCNN all the images",
            ModelName::Resnet => "Have some residuals",
        }
    }

    /// Accepted literals formatted as `'a', 'b' or 'c'`.
    pub fn expected() -> String {
        let quoted: Vec<String> = Self::VARIANTS.iter().map(|v| format!("'{v}'")).collect();
        match quoted.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
            Some((last, _)) => last.clone(),
            None => String::new(),
        }
    }
}

impl TryFrom<String> for ModelName {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
            .map_err(|_| tagged("enum", &format!("Input should be {}", Self::expected())))
    }
}
