use std::io::Write;

use super::domain::Checkin;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Writes check-ins as CSV with a header row, in the order given.
pub fn write_checkins_csv<W: Write>(writer: W, checkins: &[Checkin]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["id", "created_at", "mood", "energy", "note"])?;

    for checkin in checkins {
        let created_at = checkin.created_at.to_rfc3339();
        let mood = checkin.mood.value().to_string();
        writer.write_record([
            checkin.id.0.as_str(),
            created_at.as_str(),
            mood.as_str(),
            checkin.energy.label(),
            checkin.note.as_deref().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::workflows::checkin::{CheckinId, EnergyLevel, Mood};

    #[test]
    fn exports_header_and_quoted_notes() {
        let checkins = vec![Checkin {
            id: CheckinId("chk-000007".to_string()),
            created_at: Utc
                .with_ymd_and_hms(2025, 10, 13, 14, 30, 0)
                .single()
                .expect("valid timestamp"),
            mood: Mood::new(5).expect("valid mood"),
            energy: EnergyLevel::High,
            note: Some("project on track, feeling good".to_string()),
        }];

        let mut buffer = Vec::new();
        write_checkins_csv(&mut buffer, &checkins).expect("export succeeds");
        let output = String::from_utf8(buffer).expect("utf8 output");

        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("id,created_at,mood,energy,note"));
        assert_eq!(
            lines.next(),
            Some("chk-000007,2025-10-13T14:30:00+00:00,5,high,\"project on track, feeling good\"")
        );
        assert_eq!(lines.next(), None);
    }
}
