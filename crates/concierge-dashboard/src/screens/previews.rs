//! Banner preview slots filled by asynchronous jobs

use crate::error::{DashboardError, DashboardResult};
use concierge_core::types::Attachment;
use std::collections::BTreeMap;

/// Primary banner plus three secondary ones
pub const BANNER_SLOTS: usize = 4;

/// Check a banner slot index
///
/// # Errors
///
/// Returns [`DashboardError::InvalidSlot`] for indexes past the last slot.
pub fn check_slot(slot: usize) -> DashboardResult<usize> {
    if slot < BANNER_SLOTS {
        Ok(slot)
    } else {
        Err(DashboardError::InvalidSlot(slot))
    }
}

/// Preview data URLs keyed by slot
///
/// Jobs may finish in any order; each one writes only its own slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewSlots {
    slots: BTreeMap<usize, String>,
}

impl PreviewSlots {
    /// No previews yet
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Store a finished preview
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidSlot`] for indexes past the last slot.
    pub fn insert(&mut self, slot: usize, data_url: String) -> DashboardResult<()> {
        self.slots.insert(check_slot(slot)?, data_url);
        Ok(())
    }

    /// Preview of one slot
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }

    /// Number of finished previews
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no preview has finished
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Every slot in order, `None` where nothing finished
    #[must_use]
    pub fn to_vec(&self) -> Vec<Option<String>> {
        (0..BANNER_SLOTS)
            .map(|slot| self.slots.get(&slot).cloned())
            .collect()
    }
}

/// Pending preview for one banner slot
#[derive(Debug, Clone)]
pub struct PreviewJob {
    slot: usize,
    generation: u64,
    attachment: Attachment,
}

/// Finished preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewReady {
    /// Slot the preview belongs to
    pub slot: usize,
    /// Wizard generation the job was started in
    pub generation: u64,
    /// Inline image
    pub data_url: String,
}

impl PreviewJob {
    pub(crate) const fn new(slot: usize, generation: u64, attachment: Attachment) -> Self {
        Self {
            slot,
            generation,
            attachment,
        }
    }

    /// Slot this job fills
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.slot
    }

    /// Encode the image off the async executor
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Preview`] if the encoding task is cancelled.
    pub async fn run(self) -> DashboardResult<PreviewReady> {
        let Self {
            slot,
            generation,
            attachment,
        } = self;

        let data_url = tokio::task::spawn_blocking(move || attachment.data_url())
            .await
            .map_err(|e| DashboardError::Preview(e.to_string()))?;

        Ok(PreviewReady {
            slot,
            generation,
            data_url,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_out_of_order_inserts_land_by_index() {
        let mut previews = PreviewSlots::default();
        previews.insert(2, "c".to_string()).unwrap();
        previews.insert(0, "a".to_string()).unwrap();

        assert_eq!(
            previews.to_vec(),
            vec![Some("a".to_string()), None, Some("c".to_string()), None]
        );
        assert_eq!(previews.len(), 2);
    }

    #[test]
    fn test_slot_past_end_is_rejected() {
        let mut previews = PreviewSlots::default();
        assert!(matches!(
            previews.insert(4, "x".to_string()),
            Err(DashboardError::InvalidSlot(4))
        ));
        assert!(previews.is_empty());
    }

    #[tokio::test]
    async fn test_job_produces_data_url() {
        let job = PreviewJob::new(1, 7, Attachment::new("a.png", vec![1, 2, 3]));
        let ready = job.run().await.unwrap();

        assert_eq!(
            ready,
            PreviewReady {
                slot: 1,
                generation: 7,
                data_url: "data:image/png;base64,AQID".to_string(),
            }
        );
    }
}
