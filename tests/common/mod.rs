#![allow(dead_code)]

use std::env;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use monitoreo_reports::records::{
    AccountRecord, Activity, ChartFile, GradeGroup, GroupRef, StatisticsInput, StudentListInput,
    StudentRecord, SubjectRef, TeacherRef,
};
use monitoreo_reports::{load_assets, AsOf, AssetBundle};
use tempfile::TempDir;

const FONTS_ENV: &str = "MONITOREO_TEST_FONTS_DIR";
const SYSTEM_FONTS: &str = "/usr/share/fonts/truetype/dejavu";

/// Montserrat file names paired with the DejaVu faces used as stand-ins.
const FONT_SOURCES: [(&str, &str); 4] = [
    ("Montserrat-Regular.ttf", "DejaVuSans.ttf"),
    ("Montserrat-Bold.ttf", "DejaVuSans-Bold.ttf"),
    ("Montserrat-Italic.ttf", "DejaVuSans-Oblique.ttf"),
    ("Montserrat-BoldItalic.ttf", "DejaVuSans-BoldOblique.ttf"),
];

pub fn as_of() -> AsOf {
    AsOf::fixed("15 de octubre de 2025", "10:30:00")
}

pub fn account(index: usize) -> AccountRecord {
    AccountRecord {
        nombre: format!("Administrador {index:02}"),
        correo: format!("coordinacion{index:02}@itc.mx"),
        fecha_registro: "01 de marzo de 2025".into(),
        hora_registro: "09:00:00".into(),
        carrera: None,
    }
}

pub fn accounts(count: usize) -> Vec<AccountRecord> {
    (0..count).map(account).collect()
}

pub fn student(nombre: &str, grades: &[(&str, i64)], averages: &[f64]) -> StudentRecord {
    let mut calificaciones: Vec<GradeGroup> = averages
        .iter()
        .map(|average| GradeGroup {
            promedio_unidad: Some(*average),
            actividades: Vec::new(),
        })
        .collect();
    if calificaciones.is_empty() && !grades.is_empty() {
        calificaciones.push(GradeGroup::default());
    }
    if let Some(first) = calificaciones.first_mut() {
        first.actividades = grades
            .iter()
            .map(|(name, grade)| Activity {
                nombre_actividad: (*name).into(),
                calificacion_actividad: (*grade).into(),
            })
            .collect();
    }
    StudentRecord {
        nombre: nombre.into(),
        calificaciones,
    }
}

pub fn student_list(students: Vec<StudentRecord>) -> StudentListInput {
    StudentListInput {
        group: GroupRef {
            carrera: "Ingeniería en Sistemas Computacionales".into(),
            periodo: "AGO-DIC 2025".into(),
            numero_grupo: 3i64.into(),
        },
        subject: vec![SubjectRef {
            clave_materia: "SCD-1027".into(),
            nombre_materia: "Redes de Computadoras".into(),
        }],
        teacher: TeacherRef {
            nombre: "María Pérez".into(),
        },
        total_students: students.len().into(),
        students,
        unit: Some(2i64.into()),
        percentages: Default::default(),
    }
}

fn gradient(width: u32, height: u32, tint: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let shade = ((x + y) % 256) as u8;
        Rgb([
            tint[0].saturating_add(shade / 4),
            tint[1].saturating_add(shade / 4),
            tint[2],
        ])
    })
}

/// A PNG chart stand-in.
pub fn chart_png(tint: [u8; 3]) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(gradient(320, 160, tint))
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .expect("encode chart png");
    bytes
}

pub fn statistics_input() -> StatisticsInput {
    StatisticsInput {
        files: [[200, 40, 40], [40, 160, 40], [40, 40, 200]]
            .into_iter()
            .map(|tint| ChartFile {
                buffer: chart_png(tint),
            })
            .collect(),
        ..StatisticsInput::default()
    }
}

fn font_source_dir() -> Option<(PathBuf, bool)> {
    if let Ok(dir) = env::var(FONTS_ENV) {
        if !dir.trim().is_empty() {
            return Some((PathBuf::from(dir), true));
        }
    }
    let system = PathBuf::from(SYSTEM_FONTS);
    FONT_SOURCES
        .iter()
        .all(|(_, file)| system.join(file).is_file())
        .then_some((system, false))
}

fn copy_fonts(target: &Path) -> Option<()> {
    let (source, named_like_target) = font_source_dir()?;
    let fonts = target.join("fonts");
    fs::create_dir_all(&fonts).ok()?;
    for (name, fallback) in FONT_SOURCES {
        let file = if named_like_target { name } else { fallback };
        fs::copy(source.join(file), fonts.join(name)).ok()?;
    }
    Some(())
}

/// Asset directory with copied fonts and generated logos.
///
/// Returns `None` when no TrueType source is available on this machine.
pub fn asset_dir() -> Option<TempDir> {
    let dir = tempfile::tempdir().expect("create asset dir");
    copy_fonts(dir.path())?;
    gradient(120, 120, [20, 40, 120])
        .save(dir.path().join("tnm_logo.png"))
        .expect("write primary logo");
    gradient(80, 100, [120, 20, 40])
        .save(dir.path().join("itc.png"))
        .expect("write secondary logo");
    Some(dir)
}

/// Loaded bundle plus the directory keeping it alive.
pub fn bundle() -> Option<(TempDir, AssetBundle)> {
    let dir = asset_dir()?;
    let bundle = load_assets(dir.path()).expect("load generated assets");
    Some((dir, bundle))
}

pub fn skip(test: &str) {
    eprintln!(
        "Skipping {test}: no TrueType fonts found. Set {FONTS_ENV} to a directory with the Montserrat faces."
    );
}
