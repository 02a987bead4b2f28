// src/relay.rs
//! Line relay: reads sentences, drives the decoder and hands records to a sink

use crate::{
    error::{Rejection, RelayError, Result},
    gps::{
        data::{FixDetail, Sentence},
        merge::FixMerger,
        nmea,
    },
    serialize::{self, DeviceIdentity, Record},
};
use serde::{Deserialize, Serialize};
use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info, trace, warn};

/// How often an idle read wakes up to check the running flag
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Which records get published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RelayMode {
    /// One record per completed RMC/GGA pair
    #[default]
    Combined,
    /// One record per decoded RMC or GGA sentence
    Sentences,
    /// Both of the above
    All,
}

impl RelayMode {
    fn publishes_sentences(self) -> bool {
        matches!(self, RelayMode::Sentences | RelayMode::All)
    }

    fn publishes_combined(self) -> bool {
        matches!(self, RelayMode::Combined | RelayMode::All)
    }
}

/// Destination for serialized records
pub trait RecordSink {
    fn publish(&mut self, record: &Record) -> Result<()>;
}

/// Writes each record as one compact JSON object per line
pub struct JsonLineSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLineSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> RecordSink for JsonLineSink<W> {
    fn publish(&mut self, record: &Record) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every published record in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<Record>,
}

impl RecordSink for MemorySink {
    fn publish(&mut self, record: &Record) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub lines: u64,
    pub decoded: u64,
    pub rejected: u64,
    pub ignored: u64,
    pub published: u64,
}

/// Drives one sentence stream. Each stream needs its own relay, since the
/// merge state is per stream.
pub struct Relay {
    identity: DeviceIdentity,
    mode: RelayMode,
    merger: FixMerger,
    running: Arc<AtomicBool>,
    has_fix: bool,
    stats: RelayStats,
}

impl Relay {
    pub fn new(identity: DeviceIdentity, mode: RelayMode) -> Self {
        Self::new_with_shared(identity, mode, Arc::new(AtomicBool::new(true)))
    }

    /// Create a relay that stops when the shared running flag is cleared
    pub fn new_with_shared(
        identity: DeviceIdentity,
        mode: RelayMode,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            identity,
            mode,
            merger: FixMerger::new(),
            running,
            has_fix: false,
            stats: RelayStats::default(),
        }
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> RelayStats {
        self.stats
    }

    /// Whether the latest GGA reported a position fix
    pub fn has_fix(&self) -> bool {
        self.has_fix
    }

    /// Process one line. Only sink failures are errors; bad sentences are
    /// counted and dropped.
    pub fn handle_line<S: RecordSink>(&mut self, line: &str, sink: &mut S) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        self.stats.lines += 1;

        let sentence = match nmea::decode_sentence(line) {
            Ok(sentence) => sentence,
            Err(Rejection::Unsupported(name)) => {
                self.stats.ignored += 1;
                trace!("Ignoring {} sentence", name);
                return Ok(());
            }
            Err(rejection) => {
                self.stats.rejected += 1;
                debug!("Dropping sentence {:?}: {}", line, rejection);
                return Ok(());
            }
        };
        self.stats.decoded += 1;
        trace!("Decoded {} sentence", sentence.kind());

        if let Sentence::Gga(gga) = &sentence {
            self.track_fix(gga);
        }

        if self.mode.publishes_sentences() {
            let record = match &sentence {
                Sentence::Rmc(rmc) => serialize::serialize_rmc(rmc, &self.identity),
                Sentence::Gga(gga) => serialize::serialize_gga(gga, &self.identity),
            };
            self.publish(sink, &record)?;
        }

        if self.mode.publishes_combined() {
            if let Some(combined) = self.merger.push(sentence) {
                let timestamp = chrono::Utc::now().timestamp_millis();
                debug!(
                    "Combined fix at {:.6}, {:.6} ({} satellites)",
                    combined.latitude, combined.longitude, combined.num_satellites
                );
                let record = serialize::serialize_combined(&combined, &self.identity, timestamp);
                self.publish(sink, &record)?;
            }
        }

        Ok(())
    }

    /// Read lines until EOF, a read error, or the running flag is cleared.
    pub async fn run<R, S>(&mut self, mut reader: R, sink: &mut S) -> Result<RelayStats>
    where
        R: AsyncBufRead + Unpin,
        S: RecordSink,
    {
        let mut buf = Vec::new();

        while self.is_running() {
            // Partially read bytes stay in buf when the read times out
            let read = match tokio::time::timeout(
                STOP_POLL_INTERVAL,
                reader.read_until(b'\n', &mut buf),
            )
            .await
            {
                Ok(read) => read,
                Err(_) => continue,
            };

            match read {
                Ok(0) => {
                    // EOF; flush a final line left over from a timed-out read
                    if !buf.is_empty() {
                        let line = String::from_utf8_lossy(&buf);
                        self.handle_line(&line, sink)?;
                    }
                    break;
                }
                Ok(_) => {
                    // Corrupted bytes must not end the stream
                    let line = String::from_utf8_lossy(&buf);
                    self.handle_line(&line, sink)?;
                    buf.clear();
                }
                Err(e) => {
                    warn!("Error reading sentence stream: {}", e);
                    return Err(RelayError::Io(e));
                }
            }
        }

        info!(
            "Relay finished: {} lines, {} decoded, {} rejected, {} ignored, {} published",
            self.stats.lines,
            self.stats.decoded,
            self.stats.rejected,
            self.stats.ignored,
            self.stats.published
        );
        Ok(self.stats)
    }

    fn track_fix(&mut self, gga: &FixDetail) {
        let has_fix = gga.has_fix();
        if has_fix == self.has_fix {
            return;
        }
        if has_fix {
            info!(
                "GPS fix acquired: {} with {} satellites",
                gga.fix_description(),
                gga.num_satellites
            );
        } else {
            info!("GPS fix lost");
        }
        self.has_fix = has_fix;
    }

    fn publish<S: RecordSink>(&mut self, sink: &mut S, record: &Record) -> Result<()> {
        sink.publish(record)?;
        self.stats.published += 1;
        Ok(())
    }
}

/// Open a GPS device on a serial port
pub fn open_serial(port: &str, baudrate: u32) -> Result<SerialStream> {
    info!("Connecting to GPS on {} at {} baud...", port, baudrate);

    let serial = tokio_serial::new(port, baudrate)
        .timeout(Duration::from_millis(1000))
        .open_native_async()
        .map_err(|e| RelayError::Connection(format!("Failed to open serial port {}: {}", port, e)))?;

    info!("Connected successfully!");
    Ok(serial)
}

/// List available serial ports
pub fn list_serial_ports() -> Result<()> {
    let ports = tokio_serial::available_ports()?;

    if ports.is_empty() {
        println!("No serial ports found.");
    } else {
        println!("Available serial ports:");
        for port in ports {
            println!("  {} - {:?}", port.port_name, port.port_type);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gps::checksum::{checksum_of, format_checksum};
    use tokio::io::{AsyncWriteExt, BufReader};

    const RMC: &str = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";
    const GGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
    const GSV: &str = "$GPGSV,3,1,12,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*7F";

    fn sentence(body: &str) -> String {
        format!("${}*{}", body, format_checksum(checksum_of(body)))
    }

    fn stream(lines: &[&str]) -> BufReader<io::Cursor<Vec<u8>>> {
        let text = lines.join("\r\n") + "\r\n";
        BufReader::new(io::Cursor::new(text.into_bytes()))
    }

    #[tokio::test]
    async fn test_combined_mode_publishes_one_record_per_pair() {
        let mut relay = Relay::new(DeviceIdentity::default(), RelayMode::Combined);
        let mut sink = MemorySink::default();

        let stats = relay
            .run(stream(&[GGA, GSV, RMC, GGA, "$GPRMC,trash*00", RMC]), &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.records.len(), 2);
        assert_eq!(stats.lines, 6);
        assert_eq!(stats.decoded, 4);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.ignored, 1);
        assert_eq!(stats.published, 2);

        let record = &sink.records[0];
        assert_eq!(record["id"], "06ABC123");
        assert_eq!(record["route_id"], 1);
        assert!(record["timestamp"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_sentences_mode_publishes_each_decode() {
        let mut relay = Relay::new(DeviceIdentity::default(), RelayMode::Sentences);
        let mut sink = MemorySink::default();

        relay.run(stream(&[GGA, RMC]), &mut sink).await.unwrap();

        assert_eq!(sink.records.len(), 2);
        assert!(sink.records[0].contains_key("hdop"));
        assert!(sink.records[1].contains_key("track_angle"));
        assert!(!sink.records[1].contains_key("timestamp"));
    }

    #[tokio::test]
    async fn test_all_mode() {
        let mut relay = Relay::new(DeviceIdentity::default(), RelayMode::All);
        let mut sink = MemorySink::default();

        relay.run(stream(&[RMC, GGA]), &mut sink).await.unwrap();

        assert_eq!(sink.records.len(), 3);
        assert!(sink.records[2].contains_key("route_id"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_does_not_stop_stream() {
        let mut bytes = b"$GP\xff\xfeRMC*00\n".to_vec();
        bytes.extend_from_slice(format!("{}\n{}\n", GGA, RMC).as_bytes());
        let mut relay = Relay::new(DeviceIdentity::default(), RelayMode::Combined);
        let mut sink = MemorySink::default();

        let stats = relay
            .run(BufReader::new(io::Cursor::new(bytes)), &mut sink)
            .await
            .unwrap();

        assert_eq!(stats.lines, 3);
        assert_eq!(sink.records.len(), 1);
    }

    #[tokio::test]
    async fn test_stopped_relay_reads_nothing() {
        let mut relay = Relay::new(DeviceIdentity::default(), RelayMode::Combined);
        relay.stop();
        assert!(!relay.is_running());

        let mut sink = MemorySink::default();
        let stats = relay.run(stream(&[GGA, RMC]), &mut sink).await.unwrap();
        assert_eq!(stats, RelayStats::default());
    }

    #[tokio::test]
    async fn test_clearing_running_flag_stops_idle_stream() {
        let running = Arc::new(AtomicBool::new(true));
        let mut relay = Relay::new_with_shared(
            DeviceIdentity::default(),
            RelayMode::Combined,
            Arc::clone(&running),
        );

        // The writer stays open, so the reader never reaches EOF
        let (mut writer, reader) = tokio::io::duplex(1024);
        writer
            .write_all(format!("{}\r\n{}\r\n$GPGGA,12", GGA, RMC).as_bytes())
            .await
            .unwrap();

        let flag = Arc::clone(&running);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(false, Ordering::Relaxed);
        });

        let mut sink = MemorySink::default();
        let stats = tokio::time::timeout(
            Duration::from_secs(5),
            relay.run(BufReader::new(reader), &mut sink),
        )
        .await
        .expect("relay kept running after the flag was cleared")
        .unwrap();

        assert!(!relay.is_running());
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.published, 1);
        drop(writer);
    }

    #[tokio::test]
    async fn test_final_line_without_newline_is_handled() {
        let text = format!("{}\n{}", GGA, RMC);
        let mut relay = Relay::new(DeviceIdentity::default(), RelayMode::Combined);
        let mut sink = MemorySink::default();

        relay
            .run(BufReader::new(io::Cursor::new(text.into_bytes())), &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.records.len(), 1);
    }

    #[test]
    fn test_fix_state_follows_gga_quality() {
        let mut relay = Relay::new(DeviceIdentity::default(), RelayMode::Sentences);
        let mut sink = MemorySink::default();
        assert!(!relay.has_fix());

        relay.handle_line(GGA, &mut sink).unwrap();
        assert!(relay.has_fix());

        // RMC carries no fix quality
        relay.handle_line(RMC, &mut sink).unwrap();
        assert!(relay.has_fix());

        let no_fix = sentence("GPGGA,002153.000,,,,,0,00,99.99,,M,,M,,");
        relay.handle_line(&no_fix, &mut sink).unwrap();
        assert!(!relay.has_fix());
        assert_eq!(sink.records.len(), 3);
        assert_eq!(sink.records[2]["lat_hemi"], "");
    }

    #[test]
    fn test_json_line_sink() {
        let mut relay = Relay::new(DeviceIdentity::default(), RelayMode::Combined);
        let mut sink = JsonLineSink::new(Vec::new());

        relay.handle_line(GGA, &mut sink).unwrap();
        relay.handle_line(RMC, &mut sink).unwrap();
        relay.handle_line("   ", &mut sink).unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with(r#"{"id":"06ABC123","latitude":"#));

        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["status"], "A");
        assert_eq!(relay.stats().lines, 2);
    }
}
