use proc_macro::TokenStream;
use quote::quote;
use std::collections::HashMap;
use syn::{
    Attribute, Data, DeriveInput, Fields, Lit, Meta, Token, Type, ext::IdentExt, parse_macro_input,
};

/// Helper enum for parsed attribute values
enum MetaValue {
    Lit(Lit),
    Flag,
}

/// Declared semantic type of a field, decided from its type path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    String,
    Int,
    Bool,
    Unsupported,
}

#[derive(Debug, Default)]
struct FieldConfig {
    env_var: String,
    default: String,
    required: bool,
}

/// Derive `envconf::EnvConfig` for a struct with named fields.
///
/// Fields are annotated with `#[field(env = "VAR", default = "value", required)]`.
/// Every key is optional; a field with neither `env` nor `default` is left alone.
#[proc_macro_derive(EnvConfig, attributes(field))]
pub fn derive_env_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_env_config(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_env_config(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "EnvConfig only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "EnvConfig only supports structs",
            ));
        }
    };

    let mut descriptors = Vec::new();
    let mut apply_stmts = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let Some(field_ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let field_type = &field.ty;
        let field_name = field_ident.unraw().to_string();

        let config = parse_field_config(&field.attrs)?;
        let kind = classify(field_type);

        let env_var = &config.env_var;
        let default = &config.default;
        let required = config.required;
        let kind_tokens = match kind {
            Kind::String => quote!(::envconf::FieldKind::String),
            Kind::Int => quote!(::envconf::FieldKind::Int),
            Kind::Bool => quote!(::envconf::FieldKind::Bool),
            Kind::Unsupported => quote!(::envconf::FieldKind::Unsupported),
        };

        descriptors.push(quote! {
            ::envconf::FieldDescriptor::new(#field_name, #kind_tokens, #env_var, #default, #required)
        });

        let apply = match kind {
            Kind::String => quote! {
                if let Some(value) = loader.string(&fields[#index]) {
                    self.#field_ident = value;
                }
            },
            Kind::Int => quote! {
                if let Some(value) = loader.int(&fields[#index]) {
                    self.#field_ident = value as #field_type;
                }
            },
            Kind::Bool => quote! {
                if let Some(value) = loader.bool(&fields[#index]) {
                    self.#field_ident = value;
                }
            },
            Kind::Unsupported => quote! {
                loader.unsupported(&fields[#index]);
            },
        };
        apply_stmts.push(apply);
    }

    Ok(quote! {
        impl #impl_generics ::envconf::EnvConfig for #struct_name #ty_generics #where_clause {
            fn fields() -> &'static [::envconf::FieldDescriptor] {
                const FIELDS: &[::envconf::FieldDescriptor] = &[
                    #(#descriptors),*
                ];
                FIELDS
            }

            #[allow(unused_variables, clippy::unnecessary_cast)]
            fn apply(&mut self, loader: &mut ::envconf::Loader<'_>) {
                let fields = <Self as ::envconf::EnvConfig>::fields();

                #(#apply_stmts)*
            }
        }
    })
}

/// Parse #[field(env = "X", default = "Y", required)] syntax
fn parse_field_list(meta_list: &syn::MetaList) -> syn::Result<HashMap<String, MetaValue>> {
    let mut values = HashMap::new();

    meta_list.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .ok_or_else(|| meta.error("expected identifier"))?
            .to_string();

        if !matches!(key.as_str(), "env" | "default" | "required") {
            return Err(meta.error(format!(
                "unknown key `{}`, expected one of: env, default, required",
                key
            )));
        }

        if meta.input.peek(Token![=]) {
            meta.input.parse::<Token![=]>()?;
            let value: Lit = meta.input.parse()?;
            values.insert(key, MetaValue::Lit(value));
        } else {
            values.insert(key, MetaValue::Flag);
        }

        Ok(())
    })?;

    Ok(values)
}

fn parse_field_config(attrs: &[Attribute]) -> syn::Result<FieldConfig> {
    // Fields without #[field(...)] are described but never written
    let Some(field_attr) = attrs.iter().find(|attr| attr.path().is_ident("field")) else {
        return Ok(FieldConfig::default());
    };

    let parsed = match &field_attr.meta {
        Meta::List(list) => parse_field_list(list)?,
        _ => {
            return Err(syn::Error::new_spanned(
                field_attr,
                "field attribute must be a list: #[field(env = \"...\", default = \"...\")]",
            ));
        }
    };

    let env_var = match parsed.get("env") {
        None => String::new(),
        Some(MetaValue::Lit(Lit::Str(s))) => s.value(),
        Some(_) => {
            return Err(syn::Error::new_spanned(
                field_attr,
                "env must be a string literal: env = \"VAR_NAME\"",
            ));
        }
    };

    let default = match parsed.get("default") {
        None => String::new(),
        Some(MetaValue::Lit(lit)) => literal_to_string(lit).ok_or_else(|| {
            syn::Error::new_spanned(
                lit,
                "default must be a string, integer or boolean literal",
            )
        })?,
        Some(MetaValue::Flag) => {
            return Err(syn::Error::new_spanned(
                field_attr,
                "default needs a value: default = \"...\"",
            ));
        }
    };

    // Anything that is not a recognised boolean means "not required"
    let required = match parsed.get("required") {
        None => false,
        Some(MetaValue::Flag) => true,
        Some(MetaValue::Lit(Lit::Bool(b))) => b.value,
        Some(MetaValue::Lit(Lit::Str(s))) => parse_bool_token(&s.value()).unwrap_or(false),
        Some(MetaValue::Lit(_)) => false,
    };

    Ok(FieldConfig {
        env_var,
        default,
        required,
    })
}

fn literal_to_string(lit: &Lit) -> Option<String> {
    match lit {
        Lit::Str(s) => Some(s.value()),
        Lit::Int(i) => Some(i.base10_digits().to_string()),
        Lit::Bool(b) => Some(b.value.to_string()),
        _ => None,
    }
}

fn parse_bool_token(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Decide the field kind from a plain type path.
///
/// Only the bare name or its `std`/`core`/`alloc` path counts, so a user type
/// that happens to be called `String` is unsupported.
fn classify(ty: &Type) -> Kind {
    let Type::Path(type_path) = ty else {
        return Kind::Unsupported;
    };
    if type_path.qself.is_some() {
        return Kind::Unsupported;
    }
    if type_path
        .path
        .segments
        .iter()
        .any(|segment| !segment.arguments.is_none())
    {
        return Kind::Unsupported;
    }

    let segments: Vec<String> = type_path
        .path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    let name = match segments.as_slice() {
        [name] => *name,
        ["std" | "alloc", "string", "String"] => "String",
        ["std" | "core", "primitive", name] => *name,
        _ => return Kind::Unsupported,
    };

    match name {
        "String" => Kind::String,
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" => Kind::Int,
        "bool" => Kind::Bool,
        _ => Kind::Unsupported,
    }
}
