//! Catalog loader and resource discovery

use crate::model::{
    Attribute, DatabaseModel, DatabaseModelBuilder, EnumValue, EnumValues, Interval,
    IntervalEndpoint, IntervalType, Unit,
};
use crate::types::{RexsVersion, ValueType};
use crate::{Error, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, trace};

static CATALOG_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rexs_v(\d+)\.(\d+)_([a-z]{2})\.xml$").expect("catalog file pattern is valid")
});

/// Serializable catalog format for loading from files
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "@version")]
    version: String,
    #[serde(rename = "@language")]
    language: String,
    #[serde(rename = "@date", default)]
    date: String,
    #[serde(rename = "@status", default)]
    status: Option<String>,
    #[serde(default)]
    units: UnitsFile,
    #[serde(rename = "valueTypes", default)]
    value_types: ValueTypesFile,
    #[serde(default)]
    components: ComponentsFile,
    #[serde(default)]
    attributes: AttributesFile,
    #[serde(rename = "componentAttributeMappings", default)]
    mappings: MappingsFile,
}

#[derive(Debug, Default, Deserialize)]
struct UnitsFile {
    #[serde(default)]
    unit: Vec<UnitFile>,
}

#[derive(Debug, Deserialize)]
struct UnitFile {
    #[serde(rename = "@id")]
    id: u64,
    #[serde(rename = "@name")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ValueTypesFile {
    #[serde(rename = "valueType", default)]
    value_type: Vec<ValueTypeFile>,
}

#[derive(Debug, Deserialize)]
struct ValueTypeFile {
    #[serde(rename = "@id")]
    id: u64,
    #[serde(rename = "@name")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ComponentsFile {
    #[serde(default)]
    component: Vec<ComponentFile>,
}

#[derive(Debug, Deserialize)]
struct ComponentFile {
    #[serde(rename = "@componentId")]
    component_id: String,
    #[serde(rename = "@name", default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct AttributesFile {
    #[serde(default)]
    attribute: Vec<AttributeFile>,
}

#[derive(Debug, Deserialize)]
struct AttributeFile {
    #[serde(rename = "@attributeId")]
    attribute_id: String,
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@valueType")]
    value_type: u64,
    #[serde(rename = "@unit")]
    unit: u64,
    #[serde(rename = "@symbol", default)]
    symbol: Option<String>,
    #[serde(rename = "@rangeMin", default)]
    range_min: Option<String>,
    #[serde(rename = "@rangeMinIntervalOpen", default)]
    range_min_open: Option<String>,
    #[serde(rename = "@rangeMax", default)]
    range_max: Option<String>,
    #[serde(rename = "@rangeMaxIntervalOpen", default)]
    range_max_open: Option<String>,
    #[serde(rename = "enumValues", default)]
    enum_values: Option<EnumValuesFile>,
}

#[derive(Debug, Default, Deserialize)]
struct EnumValuesFile {
    #[serde(rename = "enumValue", default)]
    enum_value: Vec<EnumValueFile>,
}

#[derive(Debug, Deserialize)]
struct EnumValueFile {
    #[serde(rename = "@value")]
    value: String,
    #[serde(rename = "@name", default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct MappingsFile {
    #[serde(rename = "componentAttributeMapping", default)]
    mapping: Vec<MappingFile>,
}

#[derive(Debug, Deserialize)]
struct MappingFile {
    #[serde(rename = "@componentId")]
    component_id: String,
    #[serde(rename = "@attributeId")]
    attribute_id: String,
}

/// Source of raw catalog files
pub trait ResourceLoader {
    /// Feed every catalog resource to `callback` as `(name, bytes)`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while reading a resource or by the callback.
    fn load(&self, callback: &mut dyn FnMut(&str, &[u8]) -> Result<()>) -> Result<()>;
}

/// Loads every `rexs_v<major>.<minor>_<lang>.xml` file in a directory
#[derive(Debug, Clone)]
pub struct DirectoryResourceLoader {
    path: PathBuf,
}

impl DirectoryResourceLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a file name follows the catalog naming convention
    #[must_use]
    pub fn is_catalog_file(name: &str) -> bool {
        CATALOG_FILE_NAME.is_match(name)
    }
}

impl ResourceLoader for DirectoryResourceLoader {
    fn load(&self, callback: &mut dyn FnMut(&str, &[u8]) -> Result<()>) -> Result<()> {
        if !self.path.is_dir() {
            return Err(Error::NotFound(format!(
                "database directory {} does not exist",
                self.path.display()
            )));
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(Self::is_catalog_file)
            })
            .collect();
        files.sort();

        for file in files {
            trace!("Found catalog file: {:?}", file);
            let bytes = std::fs::read(&file)?;
            let name = file.to_string_lossy();
            callback(&name, &bytes)?;
        }
        Ok(())
    }
}

/// Converts catalog XML into database models
#[derive(Debug, Default, Clone, Copy)]
pub struct CatalogLoader;

impl CatalogLoader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Load every catalog a resource loader provides.
    ///
    /// # Errors
    ///
    /// Returns an error when a resource cannot be read or parsed.
    pub fn load_all(&self, resources: &dyn ResourceLoader) -> Result<Vec<DatabaseModel>> {
        let mut models = Vec::new();
        resources.load(&mut |name, bytes| {
            let model = self.load_from_bytes(name, bytes)?;
            info!(
                "Loaded database model {} {} from {}",
                model.version(),
                model.language(),
                name
            );
            models.push(model);
            Ok(())
        })?;
        Ok(models)
    }

    /// Load a catalog from a file path
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or is not a valid catalog.
    pub fn load_from_file(&self, path: &Path) -> Result<DatabaseModel> {
        trace!("Loading catalog from file: {:?}", path);
        let bytes = std::fs::read(path)?;
        self.load_from_bytes(&path.to_string_lossy(), &bytes)
    }

    /// Load a catalog from raw XML bytes; `name` is used in error messages.
    ///
    /// # Errors
    ///
    /// Returns an error when the XML does not describe a consistent catalog.
    pub fn load_from_bytes(&self, name: &str, bytes: &[u8]) -> Result<DatabaseModel> {
        let xml = std::str::from_utf8(bytes)
            .map_err(|e| Error::InvalidFormat(format!("{name}: invalid UTF-8: {e}")))?;
        let file: CatalogFile = quick_xml::de::from_str(xml)
            .map_err(|e| Error::InvalidFormat(format!("{name}: XML parse error: {e}")))?;
        self.convert_catalog_file(name, file)
    }

    /// Convert a CatalogFile to a DatabaseModel
    fn convert_catalog_file(&self, name: &str, file: CatalogFile) -> Result<DatabaseModel> {
        let version: RexsVersion = file.version.parse()?;
        let released = file
            .status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("RELEASED"));
        debug!(
            "Converting catalog {} ({} units, {} attributes, {} components)",
            name,
            file.units.unit.len(),
            file.attributes.attribute.len(),
            file.components.component.len()
        );

        let mut builder = DatabaseModelBuilder::new(version, file.language)
            .date(file.date)
            .released(released);

        let mut units = HashMap::new();
        for unit in file.units.unit {
            let unit = Unit::new(unit.id, unit.name);
            units.insert(unit.id, unit.clone());
            builder = builder.unit(unit);
        }

        let mut value_types = HashMap::new();
        for value_type in file.value_types.value_type {
            let parsed: ValueType = value_type.name.parse()?;
            value_types.insert(value_type.id, parsed);
            builder = builder.value_type(value_type.id, parsed);
        }

        for attribute in file.attributes.attribute {
            let value_type = *value_types.get(&attribute.value_type).ok_or_else(|| {
                Error::inconsistent(
                    name,
                    format!(
                        "attribute {} references unknown value type {}",
                        attribute.attribute_id, attribute.value_type
                    ),
                )
            })?;
            let unit = units.get(&attribute.unit).cloned().ok_or_else(|| {
                Error::inconsistent(
                    name,
                    format!(
                        "attribute {} references unknown unit {}",
                        attribute.attribute_id, attribute.unit
                    ),
                )
            })?;
            let interval = convert_interval(name, &attribute)?;
            let enums = attribute.enum_values.map(|values| {
                EnumValues::new(
                    values
                        .enum_value
                        .into_iter()
                        .map(|v| EnumValue {
                            value: v.value,
                            name: v.name,
                        })
                        .collect(),
                )
            });
            let symbol = attribute.symbol.filter(|s| !s.is_empty());

            builder = builder.attribute(Attribute::new(
                attribute.attribute_id,
                attribute.name,
                value_type,
                unit,
                symbol,
                interval,
                enums,
            )?);
        }

        for component in file.components.component {
            builder = builder.component(component.component_id, component.name);
        }

        for mapping in file.mappings.mapping {
            builder = builder.mapping(mapping.component_id, mapping.attribute_id);
        }

        builder.build()
    }
}

fn convert_interval(name: &str, attribute: &AttributeFile) -> Result<Option<Interval>> {
    let min = convert_endpoint(
        name,
        &attribute.attribute_id,
        attribute.range_min.as_deref(),
        attribute.range_min_open.as_deref(),
    )?;
    let max = convert_endpoint(
        name,
        &attribute.attribute_id,
        attribute.range_max.as_deref(),
        attribute.range_max_open.as_deref(),
    )?;
    if min.is_none() && max.is_none() {
        return Ok(None);
    }
    Ok(Some(Interval::new(min, max)))
}

fn convert_endpoint(
    name: &str,
    attribute_id: &str,
    value: Option<&str>,
    open: Option<&str>,
) -> Result<Option<IntervalEndpoint>> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let value: f64 = value.parse().map_err(|_| {
        Error::inconsistent(
            name,
            format!("attribute {attribute_id} has invalid range value '{value}'"),
        )
    })?;
    let kind = match open.map(str::trim) {
        Some("true") | Some("1") => IntervalType::Open,
        _ => IntervalType::Closed,
    };
    Ok(Some(IntervalEndpoint { value, kind }))
}
