use crate::domain::model::BookingSummary;
use crate::utils::error::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn write_bookings_csv<W: Write>(bookings: &[BookingSummary], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if bookings.is_empty() {
        // 沒有資料時 serde 不會輸出表頭，手動補上
        csv_writer.write_record(["seat_number", "full_name", "contact"])?;
    }
    for booking in bookings {
        csv_writer.serialize(booking)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_bookings_csv<P: AsRef<Path>>(bookings: &[BookingSummary], path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_bookings_csv(bookings, file)?;
    tracing::info!(
        "📁 Exported {} booking(s) to {}",
        bookings.len(),
        path.as_ref().display()
    );
    Ok(())
}
