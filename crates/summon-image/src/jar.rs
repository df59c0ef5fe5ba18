//! Jar scanning: every `.class` entry becomes a [`ClassStub`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::classfile::parse_class;
use crate::stub::ClassStub;
use crate::ImageError;

/// Read every class in a jar, in archive order.
///
/// Module and package descriptors are ignored, and entries this reader cannot
/// make sense of are logged and skipped: one odd classfile should not make a
/// whole jar unusable.
pub fn read_jar(path: &Path) -> Result<Vec<ClassStub>, ImageError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut classes = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();
        if !name.ends_with(".class")
            || name.ends_with("module-info.class")
            || name.ends_with("package-info.class")
        {
            continue;
        }

        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        match parse_class(&bytes) {
            Ok(stub) => classes.push(stub),
            Err(error) => {
                tracing::debug!(entry = %name, %error, "skipping unreadable classfile");
            }
        }
    }

    tracing::debug!(jar = %path.display(), classes = classes.len(), "scanned jar");
    Ok(classes)
}
