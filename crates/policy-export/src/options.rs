use serde::{Deserialize, Serialize};

pub use policy_spec::WATERMARK_TEXT;

/// Rendering options shared by both serializers.
///
/// `paid` is the only switch for the free-tier watermark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub paid: bool,
}

impl ExportOptions {
    pub fn free() -> Self {
        Self { paid: false }
    }

    pub fn paid() -> Self {
        Self { paid: true }
    }

    /// An unknown subscription state is treated as free.
    pub fn from_subscription(is_paid: Option<bool>) -> Self {
        Self {
            paid: is_paid.unwrap_or(false),
        }
    }

    pub fn watermarked(&self) -> bool {
        !self.paid
    }
}
