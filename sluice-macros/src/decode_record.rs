use crate::decode_field::{FieldMetadata, decode_field};
use convert_case::{Case, Casing};
use std::collections::HashSet;
use syn::{Error, Fields, ItemStruct, LitStr, Result, parse::ParseBuffer};

pub(crate) struct RecordMetadata {
    pub(crate) item: ItemStruct,
    pub(crate) name: String,
    pub(crate) schema: String,
    pub(crate) fields: Vec<FieldMetadata>,
}

pub(crate) fn decode_record(item: ItemStruct) -> Result<RecordMetadata> {
    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &item.generics,
            "Record cannot be derived for generic structs",
        ));
    }
    let Fields::Named(..) = &item.fields else {
        return Err(Error::new_spanned(
            &item.ident,
            "Record can only be derived for structs with named fields",
        ));
    };
    let mut name = item.ident.to_string().to_case(Case::Snake);
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut schema = String::new();
    for attr in &item.attrs {
        if !attr.path().is_ident("sluice") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let value = arg.value().and_then(ParseBuffer::parse::<LitStr>).map_err(|e| {
                    Error::new(
                        e.span(),
                        "Error while parsing `name`, use it like: `#[sluice(name = \"my_table\")]`",
                    )
                })?;
                name = value.value();
            } else if arg.path.is_ident("schema") {
                let value = arg.value().and_then(ParseBuffer::parse::<LitStr>).map_err(|e| {
                    Error::new(
                        e.span(),
                        "Error while parsing `schema`, use it like: `#[sluice(schema = \"my_schema\")]`",
                    )
                })?;
                schema = value.value();
            } else {
                return Err(arg.error("Unknown attribute inside sluice macro"));
            }
            Ok(())
        })?;
    }
    let fields = item
        .fields
        .iter()
        .map(decode_field)
        .collect::<Result<Vec<_>>>()?;
    let mut names = HashSet::new();
    for field in fields.iter().filter(|v| !v.skip) {
        if !names.insert(field.name.as_str()) {
            return Err(Error::new_spanned(
                &field.ident,
                format!("Column `{}` is declared more than once", field.name),
            ));
        }
    }
    Ok(RecordMetadata {
        item,
        name,
        schema,
        fields,
    })
}
