//! Caller-facing observation of the engine's state (§3), independent of the
//! engine's internal layout and safe to keep past subsequent `advance` calls.

use serde::{Deserialize, Serialize};

/// A point-in-time observation of a cluster-dynamics simulation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Simulated time (s).
    pub time: f64,
    /// Cumulative dose, `time * reactor.flux` (dpa).
    pub dpa: f64,
    /// Interstitial cluster concentrations for sizes `1..=N` (cm^-3),
    /// dense, length N.
    pub interstitials: Vec<f64>,
    /// Vacancy cluster concentrations for sizes `1..=N` (cm^-3), dense,
    /// length N.
    pub vacancies: Vec<f64>,
    /// Dislocation-network density (cm^-2).
    pub dislocation_density: f64,
}

impl StateSnapshot {
    /// Number of cluster sizes this snapshot tracks per species.
    pub fn max_cluster_size(&self) -> usize {
        self.interstitials.len()
    }

    /// Serializes this snapshot into a length-prefixed binary blob: a u64
    /// element count N, `time`, `dpa`, `dislocation_density`, then N
    /// interstitial and N vacancy `f64`s, all little-endian. A persistence
    /// collaborator may store this opaquely; [`StateSnapshot::from_blob`]
    /// reproduces the original vectors exactly (§8, testable property:
    /// round-trip through a length-prefixed binary blob).
    pub fn to_blob(&self) -> Vec<u8> {
        let n = self.interstitials.len();
        let mut buf = Vec::with_capacity(8 + 8 * 3 + 16 * n);
        buf.extend_from_slice(&(n as u64).to_le_bytes());
        buf.extend_from_slice(&self.time.to_le_bytes());
        buf.extend_from_slice(&self.dpa.to_le_bytes());
        buf.extend_from_slice(&self.dislocation_density.to_le_bytes());
        for &c in &self.interstitials {
            buf.extend_from_slice(&c.to_le_bytes());
        }
        for &c in &self.vacancies {
            buf.extend_from_slice(&c.to_le_bytes());
        }
        buf
    }

    /// Inverse of [`StateSnapshot::to_blob`]. Returns `None` if `bytes` is
    /// too short or its length prefix does not match its actual size.
    pub fn from_blob(bytes: &[u8]) -> Option<Self> {
        const HEADER: usize = 8 + 8 * 3;
        if bytes.len() < HEADER {
            return None;
        }
        let n = u64::from_le_bytes(bytes[0..8].try_into().ok()?) as usize;
        let time = f64::from_le_bytes(bytes[8..16].try_into().ok()?);
        let dpa = f64::from_le_bytes(bytes[16..24].try_into().ok()?);
        let dislocation_density = f64::from_le_bytes(bytes[24..32].try_into().ok()?);

        let expected_len = HEADER + 16 * n;
        if bytes.len() != expected_len {
            return None;
        }

        let mut interstitials = Vec::with_capacity(n);
        let mut offset = HEADER;
        for _ in 0..n {
            interstitials.push(f64::from_le_bytes(
                bytes[offset..offset + 8].try_into().ok()?,
            ));
            offset += 8;
        }
        let mut vacancies = Vec::with_capacity(n);
        for _ in 0..n {
            vacancies.push(f64::from_le_bytes(
                bytes[offset..offset + 8].try_into().ok()?,
            ));
            offset += 8;
        }

        Some(Self {
            time,
            dpa,
            interstitials,
            vacancies,
            dislocation_density,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_round_trip_is_exact() {
        let snapshot = StateSnapshot {
            time: 1.5e-3,
            dpa: 1.5e-3 * 2.9e-7,
            interstitials: vec![1.998e-10, 3.589e-13, 1.614e-11],
            vacancies: vec![7.743e-11, 5.22e-12, 2.61e-12],
            dislocation_density: 1e-13,
        };
        let blob = snapshot.to_blob();
        let decoded = StateSnapshot::from_blob(&blob).expect("decodes");
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn from_blob_rejects_truncated_input() {
        let snapshot = StateSnapshot {
            time: 1.0,
            dpa: 1.0,
            interstitials: vec![1.0, 2.0],
            vacancies: vec![3.0, 4.0],
            dislocation_density: 5.0,
        };
        let mut blob = snapshot.to_blob();
        blob.truncate(blob.len() - 1);
        assert!(StateSnapshot::from_blob(&blob).is_none());
    }
}
