// Thu Jan 22 2026 - Alex

use crate::correction::{Correction, CorrectionError};
use crate::event::ChannelInfo;
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How the `key` column of a correction table is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKey {
    /// Position of the channel in the input channel list.
    #[default]
    ChannelIndex,
    ChannelId,
    DetectorId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRow {
    pub key: i64,
    pub scale: f64,
    #[serde(default)]
    pub offset: Option<f64>,
}

impl CorrectionRow {
    pub fn new(key: i64, scale: f64) -> Self {
        Self { key, scale, offset: None }
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrectionTable {
    #[serde(default)]
    pub key: TableKey,
    pub rows: Vec<CorrectionRow>,
}

impl CorrectionTable {
    pub fn new(key: TableKey) -> Self {
        Self { key, rows: Vec::new() }
    }

    pub fn with_row(mut self, row: CorrectionRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Checks every row and indexes them by key.
    pub fn index(&self) -> Result<IndexMap<i64, Correction>, CorrectionError> {
        let mut entries = IndexMap::with_capacity(self.rows.len());

        for (row, entry) in self.rows.iter().enumerate() {
            if !(0.0..=1.0).contains(&entry.scale) {
                return Err(CorrectionError::InvalidCorrectionValue {
                    row,
                    key: entry.key,
                    scale: entry.scale,
                });
            }
            let offset = entry.offset.unwrap_or(0.0);
            if !offset.is_finite() {
                return Err(CorrectionError::InvalidOffset {
                    row,
                    key: entry.key,
                    offset,
                });
            }

            match entries.entry(entry.key) {
                Entry::Occupied(_) => {
                    return Err(CorrectionError::DuplicateChannel { row, key: entry.key });
                }
                Entry::Vacant(slot) => {
                    slot.insert(Correction::new(entry.scale, offset));
                }
            }
        }

        Ok(entries)
    }

    /// Entry for the channel at `index`. Under `DetectorId` at most one of the
    /// channel's detectors may have a row.
    pub fn lookup(
        &self,
        entries: &IndexMap<i64, Correction>,
        index: usize,
        channel: &ChannelInfo,
    ) -> Result<Option<Correction>, CorrectionError> {
        match self.key {
            TableKey::ChannelIndex => Ok(i64::try_from(index)
                .ok()
                .and_then(|key| entries.get(&key))
                .copied()),
            TableKey::ChannelId => Ok(entries.get(&i64::from(channel.id.0)).copied()),
            TableKey::DetectorId => {
                let mut found: Option<(i64, Correction)> = None;
                for detector in &channel.detector_ids {
                    let key = i64::from(detector.0);
                    let Some(correction) = entries.get(&key) else {
                        continue;
                    };
                    if let Some((first, _)) = found {
                        return Err(CorrectionError::ConflictingDetectorRows {
                            channel: channel.id,
                            first,
                            second: key,
                        });
                    }
                    found = Some((key, *correction));
                }
                Ok(found.map(|(_, correction)| correction))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Channel;

    #[test]
    fn test_index_rejects_scale_outside_unit_range() {
        let table = CorrectionTable::new(TableKey::ChannelIndex)
            .with_row(CorrectionRow::new(0, 0.5))
            .with_row(CorrectionRow::new(1, 1.5));
        match table.index().unwrap_err() {
            CorrectionError::InvalidCorrectionValue { row, key, .. } => assert_eq!((row, key), (1, 1)),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_index_rejects_duplicates() {
        let table = CorrectionTable::new(TableKey::ChannelIndex)
            .with_row(CorrectionRow::new(3, 0.5))
            .with_row(CorrectionRow::new(3, 0.7));
        assert!(matches!(
            table.index(),
            Err(CorrectionError::DuplicateChannel { row: 1, key: 3 })
        ));
    }

    #[test]
    fn test_lookup_by_detector() {
        let table = CorrectionTable::new(TableKey::DetectorId)
            .with_row(CorrectionRow::new(1001, 0.25).with_offset(-3.0));
        let entries = table.index().unwrap();

        let hit = Channel::new(0).with_detector(1000).with_detector(1001).info();
        let miss = Channel::new(1001).with_detector(5).info();
        assert_eq!(table.lookup(&entries, 0, &hit).unwrap(), Some(Correction::new(0.25, -3.0)));
        assert_eq!(table.lookup(&entries, 1001, &miss).unwrap(), None);
    }

    #[test]
    fn test_lookup_by_position_ignores_channel_id() {
        let table = CorrectionTable::new(TableKey::ChannelIndex)
            .with_row(CorrectionRow::new(0, 0.5))
            .with_row(CorrectionRow::new(1, 0.75));
        let entries = table.index().unwrap();

        let channel = Channel::new(1).info();
        assert_eq!(table.lookup(&entries, 0, &channel).unwrap(), Some(Correction::new(0.5, 0.0)));
        assert_eq!(table.lookup(&entries, 2, &channel).unwrap(), None);
    }

    #[test]
    fn test_lookup_by_channel_id() {
        let table = CorrectionTable::new(TableKey::ChannelId).with_row(CorrectionRow::new(40, 0.5));
        let entries = table.index().unwrap();

        assert_eq!(
            table.lookup(&entries, 0, &Channel::new(40).info()).unwrap(),
            Some(Correction::new(0.5, 0.0))
        );
        assert_eq!(table.lookup(&entries, 40, &Channel::new(0).info()).unwrap(), None);
    }

    #[test]
    fn test_lookup_rejects_two_detector_rows_for_one_channel() {
        let table = CorrectionTable::new(TableKey::DetectorId)
            .with_row(CorrectionRow::new(1000, 0.25))
            .with_row(CorrectionRow::new(1001, 0.5));
        let entries = table.index().unwrap();

        let channel = Channel::new(3).with_detector(1000).with_detector(1001).info();
        assert!(matches!(
            table.lookup(&entries, 0, &channel),
            Err(CorrectionError::ConflictingDetectorRows { channel, first: 1000, second: 1001 }) if channel.0 == 3
        ));
    }
}
