use std::io::{Cursor, Write};
use std::time::Duration;

use httpmock::prelude::*;
use httpmock::Mock;
use lottery::ArchiveFetcher;
use zip::write::SimpleFileOptions;

pub const EURO_HEADER: &str = "annee_numero_de_tirage;jour_de_tirage;date_de_tirage;date_de_forclusion;boule_1;boule_2;boule_3;boule_4;boule_5;etoile_1;etoile_2;nombre_de_gagnant_au_rang1_en_europe;";
pub const LOTO_HEADER: &str = "annee_numero_de_tirage;jour_de_tirage;date_de_tirage;date_de_forclusion;boule_1;boule_2;boule_3;boule_4;boule_5;numero_chance;";

/// Zips a Latin-1 CSV built from a header and rows, the way FDJ publishes them.
pub fn archive(header: &str, rows: &[&str]) -> Vec<u8> {
    let mut text = String::from(header);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    let latin1: Vec<u8> = text.chars().map(|c| c as u8).collect();

    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        zip.start_file("draws.csv", SimpleFileOptions::default()).unwrap();
        zip.write_all(&latin1).unwrap();
        zip.finish().unwrap();
    }
    buf
}

pub async fn serve<'a>(server: &'a MockServer, path: &str, payload: &[u8]) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(GET).path(path);
            then.status(200).body(payload);
        })
        .await
}

pub fn fetcher() -> ArchiveFetcher {
    ArchiveFetcher::new(Duration::from_secs(5)).unwrap()
}
