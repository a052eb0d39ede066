//! Reading CSV inputs and setting up the provider and random source.

use agri_db::Database;
use anyhow::Context;
use flate2::read::GzDecoder;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a text file, decompressing it first when the name ends in `.gz`.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD and logged.
pub fn read_input(path: &str) -> anyhow::Result<String> {
    let file = File::open(path).with_context(|| format!("opening {}", path))?;
    let mut bytes = Vec::new();
    if Path::new(path).extension().map_or(false, |ext| ext == "gz") {
        GzDecoder::new(file)
            .read_to_end(&mut bytes)
            .with_context(|| format!("decompressing {}", path))?;
    } else {
        let mut file = file;
        file.read_to_end(&mut bytes)
            .with_context(|| format!("reading {}", path))?;
    }
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            log::warn!(
                "{} is not valid UTF-8 (first bad byte at offset {}), replacing invalid bytes",
                path,
                e.utf8_error().valid_up_to()
            );
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// A database loaded with the feature table and, when given, the yield history.
pub fn load_database(features: Option<&str>, history: Option<&str>) -> anyhow::Result<Database> {
    let db = Database::new()?;
    if let Some(path) = features {
        db.load_features(&read_input(path)?)
            .with_context(|| format!("loading features from {}", path))?;
    }
    if let Some(path) = history {
        db.load_yield_history(&read_input(path)?)
            .with_context(|| format!("loading yield history from {}", path))?;
    }
    Ok(db)
}

/// Seeded when `seed` is given, from OS entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => {
            log::info!("Using random seed {}", seed);
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use rand::Rng;
    use std::io::Write;

    const HEADER: &str =
        "parcelle_id,date,latitude,longitude,rendement_estime,ndvi,temperature,stress_hydrique,culture\n";
    const FEATURES: &str = concat!(
        "parcelle_id,date,latitude,longitude,rendement_estime,ndvi,temperature,stress_hydrique,culture\n",
        "P1,2022-05-01,43.6,1.44,6.5,0.71,22.0,0.34,wheat\n"
    );

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("agri-cmd-{}-{}", std::process::id(), name))
    }

    #[test]
    fn reads_plain_and_gzipped_input() {
        let plain = temp_path("features.csv");
        std::fs::write(&plain, FEATURES).unwrap();

        let gz = temp_path("features.csv.gz");
        let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(FEATURES.as_bytes()).unwrap();
        encoder.finish().unwrap();

        assert_eq!(read_input(plain.to_str().unwrap()).unwrap(), FEATURES);
        assert_eq!(read_input(gz.to_str().unwrap()).unwrap(), FEATURES);
        std::fs::remove_file(plain).ok();
        std::fs::remove_file(gz).ok();
    }

    #[test]
    fn missing_input_names_the_path() {
        let err = read_input("/nonexistent/features.csv").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/features.csv"));
    }

    #[test]
    fn loads_features_only() {
        let path = temp_path("only.csv");
        std::fs::write(&path, FEATURES).unwrap();
        let db = load_database(Some(path.to_str().unwrap()), None).unwrap();
        assert_eq!(db.query_parcel_ids().unwrap(), vec!["P1"]);
        assert!(db.query_yield_history().unwrap().is_empty());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn latin1_cell_does_not_reject_the_file() {
        let path = temp_path("latin1.csv");
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"P1,2022-05-01,43.6,1.44,6.5,0.71,22.0,0.34,wheat\n");
        bytes.extend_from_slice(b"P2,2022-05-01,43.7,1.45,5.9,0.65,23.0,0.41,bl\xE9\n");
        std::fs::write(&path, &bytes).unwrap();

        let text = read_input(path.to_str().unwrap()).unwrap();
        assert!(text.contains("bl\u{FFFD}"));

        let db = load_database(Some(path.to_str().unwrap()), None).unwrap();
        assert_eq!(db.query_parcel_ids().unwrap(), vec!["P1", "P2"]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a: u64 = make_rng(Some(7)).gen();
        let b: u64 = make_rng(Some(7)).gen();
        assert_eq!(a, b);
    }
}
