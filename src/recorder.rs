//! Per-generation progress recording with CSV output.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use ndarray::Array1;

/// A single per-generation record of evolution progress.
#[derive(Debug, Clone)]
pub struct GenerationRecord {
    /// Generation number (1 after the first generation).
    pub generation: usize,
    /// Best agent found so far.
    pub best_agent: Vec<f64>,
    /// Its fitness.
    pub best_fitness: f64,
    /// Whether this generation strictly improved on the previous best.
    pub is_improvement: bool,
}

/// Records the best agent and fitness after every generation.
#[derive(Debug)]
pub struct EvolutionRecorder {
    /// Run name, used for the CSV filename.
    name: String,
    records: Vec<GenerationRecord>,
    last_best: Option<f64>,
}

impl EvolutionRecorder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), records: Vec::new(), last_best: None }
    }

    /// Append one generation's result.
    pub fn record(&mut self, generation: usize, best_agent: &Array1<f64>, best_fitness: f64) {
        let is_improvement = match self.last_best {
            Some(previous) => best_fitness < previous,
            None => true,
        };
        if is_improvement {
            self.last_best = Some(best_fitness);
        }
        self.records.push(GenerationRecord {
            generation,
            best_agent: best_agent.to_vec(),
            best_fitness,
            is_improvement,
        });
    }

    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Final best agent and fitness, if anything was recorded.
    pub fn best(&self) -> Option<(&[f64], f64)> {
        self.records.last().map(|r| (r.best_agent.as_slice(), r.best_fitness))
    }

    /// Write all records to `<dir>/<name>.csv` with the header
    /// `generation,x0..x{n-1},best_fitness,is_improvement`.
    pub fn save_to_csv(
        &self,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let dir = dir.as_ref();
        create_dir_all(dir)?;
        let path = dir.join(format!("{}.csv", self.name));
        let mut writer = csv::Writer::from_path(&path)?;

        let dim = self.records.first().map(|r| r.best_agent.len()).unwrap_or(0);
        let mut header = vec!["generation".to_string()];
        header.extend((0..dim).map(|i| format!("x{i}")));
        header.push("best_fitness".to_string());
        header.push("is_improvement".to_string());
        writer.write_record(&header)?;

        for record in &self.records {
            let mut row = vec![record.generation.to_string()];
            row.extend(record.best_agent.iter().map(|v| format!("{v:.16}")));
            row.push(format!("{:.16}", record.best_fitness));
            row.push(record.is_improvement.to_string());
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn records_track_improvements() {
        let mut recorder = EvolutionRecorder::new("test_run");
        recorder.record(1, &array![1.0, 2.0], 5.0);
        recorder.record(2, &array![0.5, 1.0], 1.25);
        recorder.record(3, &array![0.5, 1.0], 1.25);

        let records = recorder.records();
        assert_eq!(records.len(), 3);
        assert!(records[0].is_improvement);
        assert!(records[1].is_improvement);
        assert!(!records[2].is_improvement);
        assert_eq!(recorder.best(), Some((&[0.5, 1.0][..], 1.25)));
    }

    #[test]
    fn csv_has_header_and_one_row_per_generation() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = EvolutionRecorder::new("csv_check");
        recorder.record(1, &array![1.0, 2.0], 3.0);
        recorder.record(2, &array![0.0, 1.0], 1.0);

        let path = recorder.save_to_csv(dir.path()).unwrap();
        assert!(path.ends_with("csv_check.csv"));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "generation,x0,x1,best_fitness,is_improvement");
        assert!(lines[1].starts_with("1,"));
        assert!(lines[2].ends_with(",true"));
    }
}
