//! Legacy field mapping and seed SQL generation.
//!
//! The legacy flat schema used TitleCase names and free-text values for
//! everything, including booleans ("YES"/"NO"). Mapping walks the target
//! category's registry columns in order and pulls each from the best
//! legacy field; anything the legacy data never carried stays NULL rather
//! than being invented.

use partdb_core::{render_insert, ColumnDef, SchemaRegistry, SqlValue};

use crate::error::Result;
use crate::legacy::LegacyRow;

/// Author recorded on every migrated row.
const MIGRATED_BY: &str = "legacy_migration";

/// Normalizes a legacy boolean string to INTEGER 0/1.
///
/// Absent, empty, and unrecognized values all map to NULL; the table
/// defaults decide, not the migration.
pub fn normalize_boolean(value: Option<&str>) -> SqlValue {
    let Some(value) = value else {
        return SqlValue::Null;
    };
    match value.trim().to_uppercase().as_str() {
        "YES" | "Y" | "TRUE" | "1" => SqlValue::Integer(1),
        "NO" | "N" | "FALSE" | "0" => SqlValue::Integer(0),
        _ => SqlValue::Null,
    }
}

/// Part-number prefix used when generating IDs for a category.
pub fn part_id_prefix(category: &str) -> &'static str {
    match category {
        "resistors" => "RES",
        "capacitors" => "CAP",
        "inductors" => "IND",
        "ferrites" => "FER",
        "transistors" => "TRN",
        "diodes" => "DIO",
        "connectors" => "CON",
        "ic_drivers" => "DRV",
        "ic_microcontrollers" => "MCU",
        "ic_logic" => "LOG",
        "ic_memory" => "MEM",
        "ic_opamp" => "OPA",
        "ic_analog" => "ANA",
        "leds" => "LED",
        "switches" => "SW",
        _ => "PART",
    }
}

/// Generates a part ID for a row that has none.
pub fn generate_part_id(category: &str, sequence: usize) -> String {
    format!("{}-{:04}", part_id_prefix(category), sequence)
}

/// The part ID for a legacy row: explicit `Part_ID`, else the symbol
/// name, else a generated sequence number.
fn resolve_part_id(row: &LegacyRow, category: &str, counter: &mut usize) -> String {
    if let Some(id) = row.get_nonempty("Part_ID") {
        return id.to_string();
    }
    if let Some(name) = row.get_nonempty("Symbol_Name") {
        return name.to_string();
    }
    *counter += 1;
    generate_part_id(category, *counter)
}

fn opt(row: &LegacyRow, column: &str) -> SqlValue {
    match row.get(column) {
        Some(v) => SqlValue::Text(v.to_string()),
        None => SqlValue::Null,
    }
}

/// Maps one registry column from the legacy row.
fn value_for(
    column: &ColumnDef,
    category: &str,
    row: &LegacyRow,
    part_id: &str,
    timestamp: &str,
) -> SqlValue {
    match column.name {
        "part_id" => SqlValue::Text(part_id.to_string()),
        "mpn" => SqlValue::Text(row.get_nonempty("MPN").unwrap_or("UNKNOWN").to_string()),
        "manufacturer" => SqlValue::Text(
            row.get_nonempty("Manufacturer")
                .unwrap_or("Generic")
                .to_string(),
        ),
        "package" => opt(row, "Package"),
        "value" => opt(row, "Value"),
        "description" => opt(row, "Description"),
        "datasheet" => opt(row, "Datasheet"),
        "manufacturer_link" => opt(row, "Manufacturer_Link"),
        "kicad_symbol" => opt(row, "KiCad_Symbol"),
        "kicad_footprint" => opt(row, "KiCad_Footprint"),
        "altium_symbol" => opt(row, "Altium_Symbol"),
        "altium_footprint" => opt(row, "Altium_Footprint"),
        "lifecycle_status" => SqlValue::Text("Active".to_string()),
        "rohs" => normalize_boolean(row.get("RoHS")),
        "rohs_document_link" => opt(row, "RoHS_Document_Link"),
        "allow_substitution" => normalize_boolean(row.get("Allow_Substitution")),
        "tracking" => normalize_boolean(row.get("Tracking")),
        "standards_version" => SqlValue::Text(
            row.get_nonempty("Standards_Version")
                .unwrap_or("v1.0")
                .to_string(),
        ),
        "bom_comment" => opt(row, "BOM_Comment"),
        "created_at" | "updated_at" => SqlValue::Text(timestamp.to_string()),
        "created_by" => SqlValue::Text(MIGRATED_BY.to_string()),

        // Category-specific columns with a legacy counterpart. The legacy
        // schema had one generic Material / Component_Type / rating field
        // each, reused per category.
        "tolerance" => opt(row, "Tolerance"),
        "power_rating" => opt(row, "Power_Rating"),
        "temp_coeff" => opt(row, "Temp_Coeff"),
        "temp_operating" => opt(row, "Temp_Operating"),
        "temp_storage" => opt(row, "Temp_Storage"),
        "composition" | "core_material" | "dielectric" => opt(row, "Material"),
        "capacitor_type" | "inductor_type" | "ferrite_type" | "connector_type" | "led_type" => {
            opt(row, "Component_Type")
        }
        "current_rating" => opt(row, "Current_Rating"),
        "voltage_rating" => opt(row, "Voltage_Rating"),
        "impedance_at_freq" if category == "ferrites" => opt(row, "Value"),
        "forward_voltage" if category == "leds" => opt(row, "Voltage_Rating"),
        "forward_current" if category == "leds" => opt(row, "Current_Rating"),
        "pin_count" => row
            .get_nonempty("Number_of_Pins")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map_or(SqlValue::Null, SqlValue::Integer),

        // Never present in legacy data.
        _ => SqlValue::Null,
    }
}

/// Maps one legacy row to values in the category's registry column order.
pub fn map_row(
    columns: &[ColumnDef],
    category: &str,
    row: &LegacyRow,
    part_id: &str,
    timestamp: &str,
) -> Vec<SqlValue> {
    columns
        .iter()
        .map(|c| value_for(c, category, row, part_id, timestamp))
        .collect()
}

/// Renders a full category bucket as buildable seed SQL: DROP, CREATE,
/// and one INSERT per row inside a transaction.
pub fn render_bucket(
    registry: &SchemaRegistry,
    category: &str,
    rows: &[LegacyRow],
    timestamp: &str,
) -> Result<String> {
    let columns = registry.columns_for(category)?;
    let names: Vec<&str> = columns.iter().map(|c| c.name).collect();

    let mut sql = String::new();
    sql.push_str(&registry.drop_table_sql(category)?);
    sql.push_str("\n\n");
    sql.push_str(&registry.create_table_sql(category)?);
    sql.push_str("\n\nBEGIN TRANSACTION;\n\n");

    let mut counter = 0usize;
    for row in rows {
        let part_id = resolve_part_id(row, category, &mut counter);
        let values = map_row(columns, category, row, &part_id, timestamp);
        sql.push_str(&render_insert(category, &names, &values));
        sql.push('\n');
    }

    sql.push_str("\nCOMMIT;\n");
    Ok(sql)
}
