//! Module (examinable course) value object.

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Unvalidated module record, as read from a catalog file.
///
/// Use [`ModuleRecord::build`] to obtain a validated [`Module`].
///
/// # Example
///
/// ```
/// use examforge_core::ModuleRecord;
///
/// let module = ModuleRecord::new("CE1101", "CE", 1, 550)
///     .name("Basic Concepts in Environmental Engineering")
///     .common(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(module.code(), "CE1101");
/// assert_eq!(module.duration(), 1);
/// assert!(module.is_common());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub department: String,
    pub semester: u32,
    #[serde(alias = "students")]
    pub number_of_students: u32,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub iscommon: bool,
}

fn default_duration() -> u32 {
    1
}

impl ModuleRecord {
    /// Creates a single-slot, department-specific module record.
    pub fn new(
        code: impl Into<String>,
        department: impl Into<String>,
        semester: u32,
        number_of_students: u32,
    ) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            department: department.into(),
            semester,
            number_of_students,
            duration: 1,
            iscommon: false,
        }
    }

    /// Sets the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the number of consecutive slots the exam needs.
    pub fn duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    /// Marks the module as taken by every student of its semester.
    pub fn common(mut self, iscommon: bool) -> Self {
        self.iscommon = iscommon;
        self
    }

    /// Validates the record.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidModule`] when the code is empty, the
    /// semester is zero, or the duration is zero.
    pub fn build(self) -> Result<Module> {
        Module::try_from(self)
    }
}

/// A validated module: `semester > 0`, `duration >= 1`, non-empty code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ModuleRecord", into = "ModuleRecord")]
pub struct Module {
    code: String,
    name: String,
    department: String,
    semester: u32,
    number_of_students: u32,
    duration: u32,
    iscommon: bool,
}

impl Module {
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the display name, falling back to the code.
    pub fn name(&self) -> &str {
        if self.name.is_empty() {
            &self.code
        } else {
            &self.name
        }
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn semester(&self) -> u32 {
        self.semester
    }

    pub fn number_of_students(&self) -> u32 {
        self.number_of_students
    }

    /// Number of consecutive slots the exam occupies.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// True when every student of the semester sits this exam.
    pub fn is_common(&self) -> bool {
        self.iscommon
    }
}

impl TryFrom<ModuleRecord> for Module {
    type Error = CatalogError;

    fn try_from(record: ModuleRecord) -> Result<Self> {
        let invalid = |reason: &str| CatalogError::InvalidModule {
            code: record.code.clone(),
            reason: reason.to_string(),
        };
        if record.code.trim().is_empty() {
            return Err(invalid("code must not be empty"));
        }
        if record.semester == 0 {
            return Err(invalid("semester must be positive"));
        }
        if record.duration == 0 {
            return Err(invalid("duration must be at least 1 slot"));
        }
        Ok(Self {
            code: record.code,
            name: record.name,
            department: record.department,
            semester: record.semester,
            number_of_students: record.number_of_students,
            duration: record.duration,
            iscommon: record.iscommon,
        })
    }
}

impl From<Module> for ModuleRecord {
    fn from(module: Module) -> Self {
        Self {
            code: module.code,
            name: module.name,
            department: module.department,
            semester: module.semester,
            number_of_students: module.number_of_students,
            duration: module.duration,
            iscommon: module.iscommon,
        }
    }
}
