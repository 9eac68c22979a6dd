//! Timeline projection of an analyzed log.
//!
//! Only events with a parsed timestamp can be placed on a time axis. They are
//! grouped into one series per severity, in display order, each sorted by time.

use crate::models::{EventBatch, LogEvent, Severity};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One plotted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// When the event happened.
    pub timestamp: NaiveDateTime,
    /// The event message.
    pub message: String,
    /// The original line.
    pub raw_line: String,
}

/// All plotted events of one severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSeries {
    /// Severity shared by every point in the series.
    pub level: Severity,
    /// Points sorted by timestamp; ties keep input order.
    pub points: Vec<TimelinePoint>,
}

/// Severity-grouped, time-ordered view of an [`EventBatch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// Non-empty series in display order (`CRITICAL` first, `DEBUG` last).
    pub series: Vec<TimelineSeries>,
    /// Earliest plotted timestamp.
    pub start: Option<NaiveDateTime>,
    /// Latest plotted timestamp.
    pub end: Option<NaiveDateTime>,
    /// Events left out because they have no parsed timestamp.
    pub unplotted: usize,
}

impl Timeline {
    /// Builds the timeline for a batch.
    ///
    /// # Examples
    ///
    /// ```
    /// use shared::aggregator::analyze;
    /// use shared::config::AnalysisConfig;
    /// use shared::timeline::Timeline;
    ///
    /// let batch = analyze(
    ///     "2024-06-25 10:00:05 INFO b\n2024-06-25 10:00:01 ERROR a\nno time",
    ///     &AnalysisConfig::default(),
    /// );
    /// let timeline = Timeline::from_batch(&batch);
    ///
    /// assert_eq!(timeline.point_count(), 2);
    /// assert_eq!(timeline.unplotted, 1);
    /// assert_eq!(timeline.series[0].level.to_string(), "ERROR");
    /// ```
    #[must_use]
    pub fn from_batch(batch: &EventBatch) -> Self {
        let mut timed: Vec<(&LogEvent, NaiveDateTime)> = batch
            .events
            .iter()
            .filter_map(|event| event.timestamp.map(|ts| (event, ts)))
            .collect();
        let unplotted = batch.events.len() - timed.len();

        timed.sort_by_key(|(_, ts)| *ts);
        let start = timed.first().map(|(_, ts)| *ts);
        let end = timed.last().map(|(_, ts)| *ts);

        let series = Severity::DISPLAY_ORDER
            .into_iter()
            .filter_map(|level| {
                let points: Vec<TimelinePoint> = timed
                    .iter()
                    .filter(|(event, _)| event.level == level)
                    .map(|(event, ts)| TimelinePoint {
                        timestamp: *ts,
                        message: event.message.clone(),
                        raw_line: event.raw_line.clone(),
                    })
                    .collect();
                (!points.is_empty()).then_some(TimelineSeries { level, points })
            })
            .collect();

        Self {
            series,
            start,
            end,
            unplotted,
        }
    }

    /// Returns true if at least one event could be placed on the time axis.
    #[must_use]
    pub fn is_plottable(&self) -> bool {
        !self.series.is_empty()
    }

    /// Total number of plotted points across all series.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|series| series.points.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::analyze;
    use crate::config::AnalysisConfig;

    const LOG: &str = "\
2024-06-25 10:00:30,000 INFO third
2024-06-25 10:00:10,000 WARN first warning
2024-06-25 10:00:20,000 CRITICAL outage
2024-06-25 10:00:10,000 INFO second
WARN no timestamp
2024-06-25 10:00:05,000 INFO first
";

    #[test]
    fn test_series_in_display_order() {
        let timeline = Timeline::from_batch(&analyze(LOG, &AnalysisConfig::default()));

        let levels: Vec<Severity> = timeline.series.iter().map(|series| series.level).collect();
        assert_eq!(
            levels,
            vec![Severity::Critical, Severity::Warn, Severity::Info]
        );
    }

    #[test]
    fn test_points_sorted_by_time() {
        let timeline = Timeline::from_batch(&analyze(LOG, &AnalysisConfig::default()));

        let info = timeline
            .series
            .iter()
            .find(|series| series.level == Severity::Info)
            .unwrap();
        let messages: Vec<&str> = info.points.iter().map(|p| p.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_bounds_and_unplotted() {
        let timeline = Timeline::from_batch(&analyze(LOG, &AnalysisConfig::default()));

        assert_eq!(timeline.point_count(), 5);
        assert_eq!(timeline.unplotted, 1);
        assert_eq!(
            timeline.start.unwrap().to_string(),
            "2024-06-25 10:00:05"
        );
        assert_eq!(timeline.end.unwrap().to_string(), "2024-06-25 10:00:30");
    }

    #[test]
    fn test_no_timestamps_is_not_plottable() {
        let timeline = Timeline::from_batch(&analyze(
            "ERROR a\nINFO b",
            &AnalysisConfig::default(),
        ));

        assert!(!timeline.is_plottable());
        assert_eq!(timeline.unplotted, 2);
        assert!(timeline.start.is_none());
    }

    #[test]
    fn test_empty_batch() {
        let timeline = Timeline::from_batch(&EventBatch::default());
        assert_eq!(timeline, Timeline::default());
    }
}
