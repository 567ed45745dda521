mod decode_field;
mod decode_record;

use decode_record::{RecordMetadata, decode_record};
use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemStruct, parse_macro_input};

/// Derives `sluice::Record` for a struct with named fields.
///
/// Struct attributes: `#[sluice(name = "table", schema = "schema")]`, the table name defaults
/// to the snake case struct name.
///
/// Field attributes: `#[sluice(name = "column", primary_key, auto_increment,
/// default_on_insert, skip)]`, the column name defaults to the field name.
#[proc_macro_derive(Record, attributes(sluice))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemStruct);
    match decode_record(item) {
        Ok(record) => record_impl(&record).into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn record_impl(record: &RecordMetadata) -> proc_macro2::TokenStream {
    let name = &record.item.ident;
    let table_name = &record.name;
    let schema_name = &record.schema;
    let mapped = record.fields.iter().filter(|v| !v.skip).collect::<Vec<_>>();
    let field_defs = mapped.iter().map(|f| {
        let column = &f.name;
        let ident = f.ident.to_string();
        let renamed = f.renamed;
        let ty = &f.ty;
        let primary_key = f.primary_key;
        let auto_increment = f.auto_increment;
        let default_on_insert = f.default_on_insert;
        quote! {
            ::sluice::FieldDef {
                name: #column,
                ident: #ident,
                renamed: #renamed,
                value: <#ty as ::sluice::AsValue>::as_empty_value(),
                nullable: <#ty as ::sluice::AsValue>::NULLABLE && !#primary_key,
                primary_key: #primary_key,
                auto_increment: #auto_increment,
                default_on_insert: #default_on_insert,
            }
        }
    });
    let mut index = 0usize;
    let mut decode = Vec::with_capacity(record.fields.len());
    for f in &record.fields {
        let ident = &f.ident;
        decode.push(if f.skip {
            quote!(#ident: ::std::default::Default::default())
        } else {
            index += 1;
            let i = index - 1;
            quote!(#ident: ::sluice::decode_field(&fields[#i], values.next())?)
        });
    }
    let encode = mapped.iter().map(|f| {
        let ident = &f.ident;
        quote!(::sluice::AsValue::as_value(::std::clone::Clone::clone(&self.#ident)))
    });
    quote! {
        impl ::sluice::Record for #name {
            fn table_ref() -> &'static ::sluice::TableRef {
                static TABLE_REF: ::sluice::TableRef = ::sluice::TableRef {
                    name: ::std::borrow::Cow::Borrowed(#table_name),
                    schema: ::std::borrow::Cow::Borrowed(#schema_name),
                    alias: ::std::borrow::Cow::Borrowed(""),
                };
                &TABLE_REF
            }

            fn fields() -> &'static [::sluice::FieldDef] {
                static FIELDS: ::std::sync::LazyLock<Box<[::sluice::FieldDef]>> =
                    ::std::sync::LazyLock::new(|| vec![#(#field_defs),*].into_boxed_slice());
                &FIELDS
            }

            fn from_values(values: Vec<::sluice::Value>) -> ::sluice::Result<Self> {
                let fields = <Self as ::sluice::Record>::fields();
                let mut values = values.into_iter();
                Ok(Self {
                    #(#decode),*
                })
            }

            fn to_values(&self) -> Vec<::sluice::Value> {
                vec![#(#encode),*]
            }
        }
    }
}
