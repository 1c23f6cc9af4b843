//! Schema command - print expected input formats

use super::SourceArg;
use crate::record::{CsvField, TransactionRecord, TransactionsInput};
use crate::sources::Source;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,

    /// Describe a platform export instead of the normalized format
    #[arg(short, long, value_enum)]
    source: Option<SourceArg>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the JSON input document
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => {
                self.print_csv_header();
                Ok(())
            }
            SchemaFormat::CsvFields => {
                self.print_csv_fields();
                Ok(())
            }
        }
    }

    fn fields(&self) -> &'static [CsvField] {
        match self.source {
            Some(source) => Source::from(source).csv_schema(),
            None => TransactionRecord::csv_schema(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        if self.source.is_some() {
            anyhow::bail!("platform exports are CSV only; use csv-header or csv-fields");
        }
        let schema = schema_for!(TransactionsInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) {
        let names: Vec<_> = self.fields().iter().map(|f| f.name).collect();
        println!("{}", names.join(","));
    }

    fn print_csv_fields(&self) {
        for field in self.fields() {
            let required = if field.required { "required" } else { "optional" };
            println!("{:24} ({:8})  {}", field.name, required, field.description);
        }
    }
}
