use convert_case::{Case, Casing};
use syn::{Error, Field, Ident, LitStr, Result, Type, ext::IdentExt, parse::ParseBuffer};

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    /// Column name.
    pub(crate) name: String,
    /// Name given through `#[sluice(name = "...")]`.
    pub(crate) renamed: bool,
    pub(crate) primary_key: bool,
    pub(crate) auto_increment: bool,
    pub(crate) default_on_insert: bool,
    /// Not mapped to any column, filled with `Default::default()`.
    pub(crate) skip: bool,
}

fn flag(arg: &syn::meta::ParseNestedMeta, name: &str) -> Result<()> {
    if arg.input.is_empty() || arg.input.peek(syn::Token![,]) {
        Ok(())
    } else {
        Err(arg.error(format!(
            "Error while parsing `{name}`, use it like: `#[sluice({name})]`"
        )))
    }
}

pub(crate) fn decode_field(field: &Field) -> Result<FieldMetadata> {
    let Some(ident) = field.ident.clone() else {
        return Err(Error::new_spanned(field, "Record fields must be named"));
    };
    let mut name = ident.unraw().to_string();
    if name.chars().any(char::is_uppercase) {
        name = name.to_case(Case::Snake);
    }
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut metadata = FieldMetadata {
        ident,
        ty: field.ty.clone(),
        name,
        renamed: false,
        primary_key: false,
        auto_increment: false,
        default_on_insert: false,
        skip: false,
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("sluice") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let value = arg.value().and_then(ParseBuffer::parse::<LitStr>).map_err(|e| {
                    Error::new(
                        e.span(),
                        "Error while parsing `name`, use it like: `#[sluice(name = \"my_column\")]`",
                    )
                })?;
                metadata.name = value.value();
                metadata.renamed = true;
            } else if arg.path.is_ident("primary_key") {
                flag(&arg, "primary_key")?;
                metadata.primary_key = true;
            } else if arg.path.is_ident("auto_increment") {
                flag(&arg, "auto_increment")?;
                metadata.auto_increment = true;
            } else if arg.path.is_ident("default_on_insert") {
                flag(&arg, "default_on_insert")?;
                metadata.default_on_insert = true;
            } else if arg.path.is_ident("skip") {
                flag(&arg, "skip")?;
                metadata.skip = true;
            } else {
                return Err(arg.error("Unknown attribute inside sluice macro"));
            }
            Ok(())
        })?;
    }
    if metadata.name.is_empty() {
        return Err(Error::new_spanned(
            &metadata.ident,
            "The column name cannot be empty",
        ));
    }
    if metadata.skip && (metadata.primary_key || metadata.auto_increment) {
        return Err(Error::new_spanned(
            &metadata.ident,
            "A skipped field cannot be a primary key or auto increment",
        ));
    }
    Ok(metadata)
}
