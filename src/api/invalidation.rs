use serde::{Deserialize, Serialize};

/// Ordered invalidation levels, from "nothing to redraw" to "rebuild everything".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum InvalidationLevel {
    #[default]
    None,
    /// Only focus, menu or column highlight changed.
    Selection,
    /// Visible orders or lanes changed; columns are intact.
    Layout,
    /// Grid regenerated.
    Full,
}

impl InvalidationLevel {
    #[must_use]
    pub const fn max(self, other: Self) -> Self {
        if self as u8 >= other as u8 {
            self
        } else {
            other
        }
    }
}

/// Input that changed since the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvalidationTopic {
    Zoom,
    CalendarBounds,
    WorkOrders,
    WorkCenters,
    DrillFilter,
    Focus,
    Scroll,
}

impl InvalidationTopic {
    const fn bit(self) -> u16 {
        match self {
            Self::Zoom => 1 << 0,
            Self::CalendarBounds => 1 << 1,
            Self::WorkOrders => 1 << 2,
            Self::WorkCenters => 1 << 3,
            Self::DrillFilter => 1 << 4,
            Self::Focus => 1 << 5,
            Self::Scroll => 1 << 6,
        }
    }

    /// Minimum level a change of this topic requires.
    #[must_use]
    pub const fn level(self) -> InvalidationLevel {
        match self {
            Self::Zoom | Self::CalendarBounds => InvalidationLevel::Full,
            Self::WorkOrders | Self::WorkCenters | Self::DrillFilter => InvalidationLevel::Layout,
            Self::Focus | Self::Scroll => InvalidationLevel::Selection,
        }
    }
}

/// Bitmask of invalidation topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvalidationTopics {
    bits: u16,
}

impl InvalidationTopics {
    const ALL_BITS: u16 = InvalidationTopic::Zoom.bit()
        | InvalidationTopic::CalendarBounds.bit()
        | InvalidationTopic::WorkOrders.bit()
        | InvalidationTopic::WorkCenters.bit()
        | InvalidationTopic::DrillFilter.bit()
        | InvalidationTopic::Focus.bit()
        | InvalidationTopic::Scroll.bit();

    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            bits: Self::ALL_BITS,
        }
    }

    #[must_use]
    pub const fn from_topic(topic: InvalidationTopic) -> Self {
        Self { bits: topic.bit() }
    }

    #[must_use]
    pub const fn with_topic(self, topic: InvalidationTopic) -> Self {
        Self {
            bits: self.bits | topic.bit(),
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        (self.bits & other.bits) != 0
    }

    #[must_use]
    pub const fn contains_topic(self, topic: InvalidationTopic) -> bool {
        self.intersects(Self::from_topic(topic))
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }
}

/// Coalesced change record the host drains once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvalidationMask {
    level: InvalidationLevel,
    #[serde(default)]
    topics: InvalidationTopics,
}

impl InvalidationMask {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            level: InvalidationLevel::None,
            topics: InvalidationTopics::none(),
        }
    }

    #[must_use]
    pub const fn full() -> Self {
        Self {
            level: InvalidationLevel::Full,
            topics: InvalidationTopics::all(),
        }
    }

    #[must_use]
    pub const fn from_topic(topic: InvalidationTopic) -> Self {
        Self {
            level: topic.level(),
            topics: InvalidationTopics::from_topic(topic),
        }
    }

    #[must_use]
    pub const fn level(self) -> InvalidationLevel {
        self.level
    }

    #[must_use]
    pub const fn topics(self) -> InvalidationTopics {
        self.topics
    }

    #[must_use]
    pub const fn has_topic(self, topic: InvalidationTopic) -> bool {
        self.topics.contains_topic(topic)
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self.level, InvalidationLevel::None)
    }

    pub fn merge(&mut self, other: Self) {
        self.level = self.level.max(other.level);
        self.topics = self.topics.union(other.topics);
    }

    pub fn record(&mut self, topic: InvalidationTopic) {
        self.merge(Self::from_topic(topic));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_highest_level_and_unions_topics() {
        let mut mask = InvalidationMask::from_topic(InvalidationTopic::Focus);
        mask.record(InvalidationTopic::WorkOrders);
        mask.record(InvalidationTopic::Scroll);
        assert_eq!(mask.level(), InvalidationLevel::Layout);
        assert!(mask.has_topic(InvalidationTopic::Focus));
        assert!(mask.has_topic(InvalidationTopic::WorkOrders));
        assert!(!mask.has_topic(InvalidationTopic::Zoom));
    }

    #[test]
    fn zoom_change_requires_full_rebuild() {
        let mask = InvalidationMask::from_topic(InvalidationTopic::Zoom);
        assert_eq!(mask.level(), InvalidationLevel::Full);
        assert!(!mask.is_none());
        assert!(InvalidationMask::default().is_none());
    }
}
