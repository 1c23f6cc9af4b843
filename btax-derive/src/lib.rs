use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Expr, Field, Fields, Lit, Meta, Type};

/// Derives a `csv_schema()` method describing the struct as a CSV record.
///
/// Each named field contributes one `CsvField` entry:
/// - name: the CSV column name (honours `#[serde(rename = "...")]`)
/// - required: false when the field type is `Option<T>`
/// - description: the field's doc comment
#[proc_macro_derive(CsvSchema, attributes(serde))]
pub fn derive_csv_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => panic!("CsvSchema requires named fields"),
        },
        _ => panic!("CsvSchema can only be derived for structs"),
    };

    let entries = fields.iter().map(|field| {
        let column = column_name(field);
        let required = !is_option(&field.ty);
        let description = doc_comment(field);
        quote! {
            CsvField {
                name: #column,
                required: #required,
                description: #description,
            }
        }
    });

    let expanded = quote! {
        impl #name {
            pub fn csv_schema() -> &'static [CsvField] {
                static SCHEMA: &[CsvField] = &[#(#entries),*];
                SCHEMA
            }
        }
    };

    TokenStream::from(expanded)
}

/// CSV column name: `#[serde(rename = "...")]` wins over the field identifier.
fn column_name(field: &Field) -> String {
    for attr in &field.attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        let Meta::List(list) = &attr.meta else {
            continue;
        };
        let tokens = list.tokens.to_string();
        if let Some(pos) = tokens.find("rename") {
            let rest = &tokens[pos..];
            if let Some(eq) = rest.find('=') {
                let value = rest[eq + 1..].trim();
                if let Some(stripped) = value.strip_prefix('"') {
                    if let Some(end) = stripped.find('"') {
                        return stripped[..end].to_string();
                    }
                }
            }
        }
    }
    field.ident.as_ref().expect("named field").to_string()
}

fn doc_comment(field: &Field) -> String {
    let lines: Vec<String> = field
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(lit) => match &lit.lit {
                    Lit::Str(s) => Some(s.value().trim().to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect();
    lines.join(" ")
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
