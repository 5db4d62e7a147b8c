//! Per-category column catalog.
//!
//! The registry is the single source of truth for table layout: the ordered
//! column list (22 shared core columns followed by category-specific
//! columns), column types, defaults, and the primary key. Both the builder
//! and the dumper consult it, so independently-authored SQL text always
//! agrees on column order with freshly generated dumps. The live database's
//! own column order is never trusted; it may drift after ad hoc edits.
//!
//! Categories are defined once, at authoring time. Schema evolution means
//! editing this module, never inferring layout at runtime.

use std::collections::BTreeMap;

use crate::error::{RegistryError, Result};

/// Number of core columns shared by every category table.
pub const CORE_COLUMN_COUNT: usize = 22;

/// Declared SQL type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// TEXT affinity.
    Text,
    /// INTEGER affinity.
    Integer,
    /// REAL affinity.
    Real,
    /// Stored as INTEGER 0/1.
    Boolean,
    /// ISO-8601 text timestamps.
    Timestamp,
}

impl ColumnType {
    /// The type name as it appears in `CREATE TABLE` statements.
    pub fn sql_name(self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Timestamp => "TIMESTAMP",
        }
    }
}

/// One column of a category table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    /// Column name, snake_case.
    pub name: &'static str,
    /// Declared type.
    pub col_type: ColumnType,
    /// Default value as a SQL literal, verbatim in `CREATE TABLE`.
    pub default: Option<&'static str>,
    /// Whether the column carries NOT NULL.
    pub not_null: bool,
    /// Whether the column is (part of) the primary key.
    pub primary_key: bool,
}

const fn col(name: &'static str, col_type: ColumnType) -> ColumnDef {
    ColumnDef {
        name,
        col_type,
        default: None,
        not_null: false,
        primary_key: false,
    }
}

const fn col_default(
    name: &'static str,
    col_type: ColumnType,
    default: &'static str,
) -> ColumnDef {
    ColumnDef {
        name,
        col_type,
        default: Some(default),
        not_null: false,
        primary_key: false,
    }
}

use ColumnType::{Boolean, Integer, Real, Text, Timestamp};

/// The fixed core column set, identical across every category table.
///
/// Relative order is the canonicity contract the dumper relies on:
/// identity, physical/display, documentation, CAD cross-reference,
/// supply-chain/lifecycle, process-control, audit metadata.
const CORE_COLUMNS: [ColumnDef; CORE_COLUMN_COUNT] = [
    ColumnDef {
        name: "part_id",
        col_type: Text,
        default: None,
        not_null: false,
        primary_key: true,
    },
    ColumnDef {
        name: "mpn",
        col_type: Text,
        default: None,
        not_null: true,
        primary_key: false,
    },
    ColumnDef {
        name: "manufacturer",
        col_type: Text,
        default: None,
        not_null: true,
        primary_key: false,
    },
    col("package", Text),
    col("value", Text),
    col("description", Text),
    col("datasheet", Text),
    col("manufacturer_link", Text),
    col("kicad_symbol", Text),
    col("kicad_footprint", Text),
    col("altium_symbol", Text),
    col("altium_footprint", Text),
    col_default("lifecycle_status", Text, "'Active'"),
    col_default("rohs", Boolean, "1"),
    col("rohs_document_link", Text),
    col_default("allow_substitution", Boolean, "1"),
    col_default("tracking", Boolean, "0"),
    col_default("standards_version", Text, "'v1.0'"),
    col("bom_comment", Text),
    col("created_at", Timestamp),
    col("updated_at", Timestamp),
    col("created_by", Text),
];

const CAPACITORS: &[ColumnDef] = &[
    col("tolerance", Text),
    col("voltage_rating", Text),
    col("dielectric", Text),
    col("capacitor_type", Text),
    col("esr", Text),
    col("ripple_current", Text),
    col("temp_operating", Text),
    col("temp_storage", Text),
    col("temp_coeff", Text),
];

const CONNECTORS: &[ColumnDef] = &[
    col("connector_type", Text),
    col("pin_count", Integer),
    col("rows", Integer),
    col("pitch", Text),
    col("mounting_type", Text),
    col("orientation", Text),
    col("current_rating", Text),
    col("voltage_rating", Text),
    col("gender", Text),
    col("mating_cycles", Integer),
    col("temp_operating", Text),
    col("temp_storage", Text),
];

const DIODES: &[ColumnDef] = &[
    col("diode_type", Text),
    col("forward_voltage", Text),
    col("forward_current", Text),
    col("reverse_voltage", Text),
    col("reverse_current", Text),
    col("power_dissipation", Text),
    col("recovery_time", Text),
    col("capacitance", Text),
    col("zener_voltage", Text),
    col("clamping_voltage", Text),
    col("temp_operating", Text),
    col("temp_storage", Text),
    col("temp_junction_max", Text),
];

const FERRITES: &[ColumnDef] = &[
    col("impedance_at_freq", Text),
    col("test_frequency", Text),
    col("dc_resistance", Text),
    col("current_rating", Text),
    col("tolerance", Text),
    col("ferrite_type", Text),
    col("temp_operating", Text),
    col("temp_storage", Text),
];

const IC_ANALOG: &[ColumnDef] = &[
    col("function_type", Text),
    col("resolution", Text),
    col("channels", Integer),
    col("sample_rate", Text),
    col("interface", Text),
    col("output_voltage", Text),
    col("output_current", Text),
    col("dropout_voltage", Text),
    col("efficiency", Text),
    col("propagation_delay", Text),
    col("input_offset_voltage", Text),
    col("reference_voltage", Text),
    col("temp_coeff", Text),
    col("supply_voltage_min", Text),
    col("supply_voltage_max", Text),
    col("supply_current", Text),
    col("temp_operating", Text),
    col("temp_storage", Text),
    col("temp_junction_max", Text),
];

const IC_DRIVERS: &[ColumnDef] = &[
    col("driver_type", Text),
    col("channels", Integer),
    col("output_current", Text),
    col("supply_voltage_min", Text),
    col("supply_voltage_max", Text),
    col("logic_voltage", Text),
    col("output_type", Text),
    col("switching_freq", Text),
    col("control_interface", Text),
    col("temp_operating", Text),
    col("temp_storage", Text),
    col("temp_junction_max", Text),
];

const IC_LOGIC: &[ColumnDef] = &[
    col("logic_family", Text),
    col("gate_type", Text),
    col("gates_per_package", Integer),
    col("supply_voltage_min", Text),
    col("supply_voltage_max", Text),
    col("propagation_delay", Text),
    col("output_current", Text),
    col("input_type", Text),
    col("output_type", Text),
    col("temp_operating", Text),
    col("temp_storage", Text),
];

const IC_MEMORY: &[ColumnDef] = &[
    col("memory_type", Text),
    col("capacity", Text),
    col("organization", Text),
    col("interface", Text),
    col("access_time", Text),
    col("clock_speed", Text),
    col("supply_voltage", Text),
    col("write_cycles", Text),
    col("data_retention", Text),
    col("temp_operating", Text),
    col("temp_storage", Text),
];

const IC_MICROCONTROLLERS: &[ColumnDef] = &[
    col("mcu_family", Text),
    col("core_architecture", Text),
    col("clock_speed", Text),
    col("flash_size", Text),
    col("ram_size", Text),
    col("eeprom_size", Text),
    col("gpio_count", Integer),
    col("adc_channels", Integer),
    col("dac_channels", Integer),
    col("timers", Integer),
    col("uart_count", Integer),
    col("spi_count", Integer),
    col("i2c_count", Integer),
    col("usb_support", Boolean),
    col("can_support", Boolean),
    col("ethernet_support", Boolean),
    col("supply_voltage_min", Text),
    col("supply_voltage_max", Text),
    col("temp_operating", Text),
    col("temp_storage", Text),
    col("temp_junction_max", Text),
];

const IC_OPAMP: &[ColumnDef] = &[
    col("opamp_type", Text),
    col("channels", Integer),
    col("gbw_product", Text),
    col("slew_rate", Text),
    col("input_offset_voltage", Text),
    col("input_bias_current", Text),
    col("input_impedance", Text),
    col("cmrr", Text),
    col("supply_voltage_min", Text),
    col("supply_voltage_max", Text),
    col("supply_current", Text),
    col("output_current", Text),
    col("noise_voltage", Text),
    col("rail_to_rail", Boolean),
    col("temp_operating", Text),
    col("temp_storage", Text),
    col("temp_junction_max", Text),
];

const INDUCTORS: &[ColumnDef] = &[
    col("tolerance", Text),
    col("current_rating", Text),
    col("saturation_current", Text),
    col("dc_resistance", Text),
    col("self_resonant_freq", Text),
    col("inductor_type", Text),
    col("core_material", Text),
    col("shielded", Boolean),
    col("temp_operating", Text),
    col("temp_storage", Text),
];

const LEDS: &[ColumnDef] = &[
    col("color", Text),
    col("wavelength", Text),
    col("forward_voltage", Text),
    col("forward_current", Text),
    col("luminous_intensity", Text),
    col("viewing_angle", Text),
    col("led_type", Text),
    col("lens_type", Text),
    col("temp_operating", Text),
    col("temp_storage", Text),
];

const RESISTORS: &[ColumnDef] = &[
    col("tolerance", Text),
    col("power_rating", Text),
    col("temp_coeff", Text),
    col("voltage_rating", Text),
    col("composition", Text),
    col("temp_operating", Text),
    col("temp_storage", Text),
];

const SWITCHES: &[ColumnDef] = &[
    col("switch_type", Text),
    col("poles", Integer),
    col("throw", Integer),
    col("circuit_config", Text),
    col("actuation_force", Text),
    col("travel_distance", Text),
    col("mounting_type", Text),
    col("orientation", Text),
    col("current_rating", Text),
    col("voltage_rating", Text),
    col("mechanical_life", Integer),
    col("temp_operating", Text),
    col("temp_storage", Text),
];

const TRANSISTORS: &[ColumnDef] = &[
    col("transistor_type", Text),
    col("polarity", Text),
    col("vce_vds_max", Text),
    col("ic_id_max", Text),
    col("vgs_vbe_threshold", Text),
    col("rds_on", Text),
    col("hfe_gain", Text),
    col("power_dissipation", Text),
    col("transition_freq", Text),
    col("temp_operating", Text),
    col("temp_storage", Text),
    col("temp_junction_max", Text),
];

const CATEGORY_DEFS: &[(&str, &[ColumnDef])] = &[
    ("capacitors", CAPACITORS),
    ("connectors", CONNECTORS),
    ("diodes", DIODES),
    ("ferrites", FERRITES),
    ("ic_analog", IC_ANALOG),
    ("ic_drivers", IC_DRIVERS),
    ("ic_logic", IC_LOGIC),
    ("ic_memory", IC_MEMORY),
    ("ic_microcontrollers", IC_MICROCONTROLLERS),
    ("ic_opamp", IC_OPAMP),
    ("inductors", INDUCTORS),
    ("leds", LEDS),
    ("resistors", RESISTORS),
    ("switches", SWITCHES),
    ("transistors", TRANSISTORS),
];

/// Ordered column catalog for every category table.
///
/// Pure lookup, no side effects. The iteration order of
/// [`categories`](Self::categories) is lexicographic, matching the order
/// the builder and verifier process tables in.
///
/// # Examples
///
/// ```
/// use partdb_core::SchemaRegistry;
///
/// let registry = SchemaRegistry::builtin();
/// assert_eq!(registry.categories().len(), 15);
/// assert_eq!(registry.primary_key_for("resistors").unwrap(), vec!["part_id"]);
/// assert!(registry.columns_for("vacuum_tubes").is_err());
/// ```
#[derive(Debug)]
pub struct SchemaRegistry {
    tables: BTreeMap<&'static str, Vec<ColumnDef>>,
}

impl SchemaRegistry {
    /// Returns the built-in catalog of 15 component categories.
    pub fn builtin() -> Self {
        let mut tables = BTreeMap::new();
        for (name, specific) in CATEGORY_DEFS {
            let mut columns = Vec::with_capacity(CORE_COLUMN_COUNT + specific.len());
            columns.extend_from_slice(&CORE_COLUMNS);
            columns.extend_from_slice(specific);
            tables.insert(*name, columns);
        }
        Self { tables }
    }

    /// All registered category names, lexicographically sorted.
    pub fn categories(&self) -> Vec<&'static str> {
        self.tables.keys().copied().collect()
    }

    /// Returns `true` if the category is registered.
    pub fn contains(&self, category: &str) -> bool {
        self.tables.contains_key(category)
    }

    /// The full ordered column list for a category: 22 core columns, then
    /// the category-specific columns.
    pub fn columns_for(&self, category: &str) -> Result<&[ColumnDef]> {
        self.tables
            .get(category)
            .map(Vec::as_slice)
            .ok_or_else(|| RegistryError::UnknownCategory(category.to_string()))
    }

    /// Primary-key column names in declared key order.
    pub fn primary_key_for(&self, category: &str) -> Result<Vec<&'static str>> {
        let columns = self.columns_for(category)?;
        Ok(columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name)
            .collect())
    }

    /// The canonical `CREATE TABLE` statement for a category, columns and
    /// declared defaults verbatim from the registry.
    pub fn create_table_sql(&self, category: &str) -> Result<String> {
        let columns = self.columns_for(category)?;
        let mut sql = format!("CREATE TABLE {category} (\n");
        for (i, column) in columns.iter().enumerate() {
            sql.push_str("    \"");
            sql.push_str(column.name);
            sql.push_str("\" ");
            sql.push_str(column.col_type.sql_name());
            if column.primary_key {
                sql.push_str(" PRIMARY KEY COLLATE NOCASE");
            }
            if column.not_null {
                sql.push_str(" NOT NULL");
            }
            if let Some(default) = column.default {
                sql.push_str(" DEFAULT ");
                sql.push_str(default);
            }
            if i + 1 < columns.len() {
                sql.push(',');
            }
            sql.push('\n');
        }
        sql.push_str(");");
        Ok(sql)
    }

    /// The canonical `DROP TABLE IF EXISTS` statement for a category.
    pub fn drop_table_sql(&self, category: &str) -> Result<String> {
        if !self.contains(category) {
            return Err(RegistryError::UnknownCategory(category.to_string()));
        }
        Ok(format!("DROP TABLE IF EXISTS {category};"))
    }
}
