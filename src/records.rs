//! Input records handed over by the data layer, one shape per report.
//!
//! Field names follow the JSON documents stored by the monitoring system.

use serde::{Deserialize, Serialize};

use crate::aggregate::OutcomeSummary;
use crate::model::{base64_bytes, CellValue};

/// An administrator or teacher account as listed in the roster exports.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub nombre: String,
    pub correo: String,
    #[serde(default)]
    pub fecha_registro: String,
    #[serde(default)]
    pub hora_registro: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrera: Option<String>,
}

/// An academic period registered for a career.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRecord {
    pub periodo: String,
    pub clave_reticula: String,
    #[serde(default)]
    pub fecha_registro: String,
    #[serde(default)]
    pub hora_registro: String,
    #[serde(default)]
    pub carrera: Option<String>,
}

/// Outcome figures of one group a teacher taught.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachingGroup {
    pub periodo: String,
    pub alumnos_aprobados: CellValue,
    pub porcentaje_aprobados: CellValue,
    pub alumnos_reprobados: CellValue,
    pub porcentaje_reprobados: CellValue,
    pub alumnos_desertados: CellValue,
    pub porcentaje_desertados: CellValue,
}

/// A subject reference (key and name).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRef {
    pub clave_materia: String,
    pub nombre_materia: String,
}

/// A teacher reference.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeacherRef {
    pub nombre: String,
}

/// Identification of a class group.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRef {
    pub carrera: String,
    pub periodo: String,
    pub numero_grupo: CellValue,
}

/// One graded activity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub nombre_actividad: String,
    pub calificacion_actividad: CellValue,
}

/// The grades of one unit: its average and its activities.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeGroup {
    #[serde(default)]
    pub promedio_unidad: Option<f64>,
    #[serde(default)]
    pub actividades: Vec<Activity>,
}

/// A student and every grade group recorded for them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub nombre: String,
    #[serde(default)]
    pub calificaciones: Vec<GradeGroup>,
}

impl StudentRecord {
    /// Names of every activity across all grade groups, in record order.
    pub fn activity_names(&self) -> impl Iterator<Item = &str> {
        self.calificaciones
            .iter()
            .flat_map(|group| group.actividades.iter())
            .map(|activity| activity.nombre_actividad.as_str())
    }

    /// The first grade recorded for the activity called `name`.
    pub fn grade_for(&self, name: &str) -> Option<&CellValue> {
        self.calificaciones
            .iter()
            .flat_map(|group| group.actividades.iter())
            .find(|activity| activity.nombre_actividad == name)
            .map(|activity| &activity.calificacion_actividad)
    }

    /// Unit averages, one per grade group.
    pub fn unit_averages(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.calificaciones.iter().map(|group| group.promedio_unidad)
    }
}

/// Input of the administrator and teacher exports.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterInput {
    pub records: Vec<AccountRecord>,
    #[serde(default)]
    pub carrera: Option<String>,
}

/// Input of the period export.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodInput {
    pub records: Vec<PeriodRecord>,
}

/// Input of the teaching history export.
///
/// `groups[i]` was taught as `subjects[i]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeachingHistoryInput {
    pub groups: Vec<TeachingGroup>,
    #[serde(default)]
    pub subjects: Vec<SubjectRef>,
    #[serde(default)]
    pub teacher: Option<TeacherRef>,
}

/// Input of the student grade list export.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentListInput {
    pub group: GroupRef,
    pub subject: Vec<SubjectRef>,
    pub teacher: TeacherRef,
    #[serde(default)]
    pub students: Vec<StudentRecord>,
    #[serde(default)]
    pub unit: Option<CellValue>,
    #[serde(default)]
    pub percentages: OutcomeSummary,
    #[serde(default)]
    pub total_students: CellValue,
}

/// A rendered chart image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartFile {
    #[serde(with = "base64_bytes")]
    pub buffer: Vec<u8>,
}

/// Input of the statistics export.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsInput {
    #[serde(default)]
    pub group: Option<GroupRef>,
    #[serde(default)]
    pub subject: Vec<SubjectRef>,
    #[serde(default)]
    pub teacher: Option<TeacherRef>,
    #[serde(default)]
    pub students: Vec<StudentRecord>,
    pub files: Vec<ChartFile>,
}
