//! Font and image assets loaded once at process start.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use genpdf::error::Error;
use genpdf::fonts::{FontData, FontFamily};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// Name of the font family every report is typeset in.
const FONT_FAMILY_NAME: &str = "Montserrat";

const FONT_DIR: &str = "fonts";

const FONT_FILES: [(FontFace, &str); 4] = [
    (FontFace::Regular, "Montserrat-Regular.ttf"),
    (FontFace::Bold, "Montserrat-Bold.ttf"),
    (FontFace::Italic, "Montserrat-Italic.ttf"),
    (FontFace::BoldItalic, "Montserrat-BoldItalic.ttf"),
];

const IMAGE_FILES: [(ImageAsset, &str); 2] = [
    (ImageAsset::PrimaryLogo, "tnm_logo.png"),
    (ImageAsset::SecondaryLogo, "itc.png"),
];

/// The four faces of the report font family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

/// Static images printed in every report header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageAsset {
    /// National institute logo, printed on the left.
    PrimaryLogo,
    /// Campus logo, printed on the right.
    SecondaryLogo,
}

fn font_path(root: &Path, file: &str) -> PathBuf {
    root.join(FONT_DIR).join(file)
}

/// Lists the required asset files that are absent under `root`.
pub fn missing_asset_files(root: &Path) -> Vec<PathBuf> {
    FONT_FILES
        .iter()
        .map(|(_, file)| font_path(root, file))
        .chain(IMAGE_FILES.iter().map(|(_, file)| root.join(file)))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

fn read_required(path: PathBuf) -> Result<Arc<[u8]>, AssetError> {
    if !path.is_file() {
        return Err(AssetError::Missing { path });
    }
    fs::read(&path)
        .map(Arc::from)
        .map_err(|source| AssetError::Read { path, source })
}

/// Immutable set of fonts and images shared by every report generation.
///
/// The bundle is cheap to clone; all payloads are reference counted.
#[derive(Clone, Debug)]
pub struct AssetBundle {
    regular: Arc<[u8]>,
    bold: Arc<[u8]>,
    italic: Arc<[u8]>,
    bold_italic: Arc<[u8]>,
    primary_logo: Arc<[u8]>,
    secondary_logo: Arc<[u8]>,
}

/// Reads every required font and image under `root`.
///
/// Fails on the first missing or unreadable file; the caller is expected to
/// abort initialization in that case.
pub fn load_assets(root: impl AsRef<Path>) -> Result<AssetBundle, AssetError> {
    let root = root.as_ref();
    let [regular, bold, italic, bold_italic] =
        FONT_FILES.map(|(_, file)| font_path(root, file));
    let [primary_logo, secondary_logo] = IMAGE_FILES.map(|(_, file)| root.join(file));

    let bundle = AssetBundle {
        regular: read_required(regular)?,
        bold: read_required(bold)?,
        italic: read_required(italic)?,
        bold_italic: read_required(bold_italic)?,
        primary_logo: read_required(primary_logo)?,
        secondary_logo: read_required(secondary_logo)?,
    };

    info!(
        "Loaded {} {FONT_FAMILY_NAME} faces and {} images from {}",
        FONT_FILES.len(),
        IMAGE_FILES.len(),
        root.display()
    );
    Ok(bundle)
}

impl AssetBundle {
    /// Raw bytes of a font face.
    pub fn font(&self, face: FontFace) -> &[u8] {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Italic => &self.italic,
            FontFace::BoldItalic => &self.bold_italic,
        }
    }

    /// Raw bytes of a header image.
    pub fn image(&self, asset: ImageAsset) -> &[u8] {
        match asset {
            ImageAsset::PrimaryLogo => &self.primary_logo,
            ImageAsset::SecondaryLogo => &self.secondary_logo,
        }
    }

    /// Base64 payload of a font face.
    pub fn encoded_font(&self, face: FontFace) -> String {
        STANDARD.encode(self.font(face))
    }

    /// `data:` URL for a header image.
    pub fn data_url(&self, asset: ImageAsset) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(self.image(asset)))
    }

    /// Builds a `genpdf` font family from the loaded faces.
    ///
    /// A fresh family is built per document so no font state is shared
    /// between concurrent renders.
    pub fn font_family(&self) -> Result<FontFamily<FontData>, Error> {
        let load = |face: FontFace| FontData::new(self.font(face).to_vec(), None);
        Ok(FontFamily {
            regular: load(FontFace::Regular)?,
            bold: load(FontFace::Bold)?,
            italic: load(FontFace::Italic)?,
            bold_italic: load(FontFace::BoldItalic)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_all_assets(root: &Path) {
        fs::create_dir_all(root.join(FONT_DIR)).expect("font dir");
        for (_, file) in FONT_FILES {
            fs::write(font_path(root, file), file.as_bytes()).expect("font file");
        }
        for (_, file) in IMAGE_FILES {
            fs::write(root.join(file), file.as_bytes()).expect("image file");
        }
    }

    #[test]
    fn loads_complete_asset_set() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_all_assets(dir.path());

        let bundle = load_assets(dir.path()).expect("assets load");
        assert_eq!(bundle.font(FontFace::Bold), b"Montserrat-Bold.ttf");
        assert_eq!(bundle.image(ImageAsset::SecondaryLogo), b"itc.png");
        assert!(missing_asset_files(dir.path()).is_empty());
    }

    #[test]
    fn missing_image_fails_fast_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_all_assets(dir.path());
        fs::remove_file(dir.path().join("itc.png")).expect("remove logo");

        match load_assets(dir.path()) {
            Err(AssetError::Missing { path }) => assert!(path.ends_with("itc.png")),
            other => panic!("expected missing asset error, got {other:?}"),
        }
    }

    #[test]
    fn encodes_payloads_as_base64() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_all_assets(dir.path());
        let bundle = load_assets(dir.path()).expect("assets load");

        assert_eq!(
            bundle.data_url(ImageAsset::PrimaryLogo),
            "data:image/png;base64,dG5tX2xvZ28ucG5n"
        );
        assert_eq!(
            bundle.encoded_font(FontFace::Regular),
            STANDARD.encode(b"Montserrat-Regular.ttf")
        );
    }
}
