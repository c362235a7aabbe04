use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, Data, DeriveInput, Fields, Lit, Token,
};

/// Arguments accepted inside `#[shape(...)]`, on the container or on a field.
#[derive(Default)]
struct ShapeArgs {
    rename_all: Option<String>,
    rename: Option<String>,
    skip: bool,
}

impl Parse for ShapeArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = ShapeArgs::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;

            match ident.to_string().as_str() {
                "skip" => args.skip = true,
                "rename" | "rename_all" => {
                    input.parse::<Token![=]>()?;
                    let lit: Lit = input.parse()?;
                    let value = if let Lit::Str(s) = lit {
                        s.value()
                    } else {
                        return Err(syn::Error::new(
                            lit.span(),
                            format!("{} must be a string literal", ident),
                        ));
                    };
                    if ident == "rename" {
                        args.rename = Some(value);
                    } else {
                        args.rename_all = Some(value);
                    }
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!(
                            "unknown attribute `{}`, expected `rename`, `rename_all`, or `skip`",
                            other
                        ),
                    ));
                }
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

/// Collects every `#[shape(...)]` attribute in `attrs` into one set of arguments.
fn shape_args(attrs: &[syn::Attribute]) -> syn::Result<ShapeArgs> {
    let mut merged = ShapeArgs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("shape")) {
        let args: ShapeArgs = attr.parse_args()?;
        merged.skip |= args.skip;
        if args.rename.is_some() {
            merged.rename = args.rename;
        }
        if args.rename_all.is_some() {
            merged.rename_all = args.rename_all;
        }
    }
    Ok(merged)
}

/// Applies a serde-style `rename_all` rule to a snake_case field identifier.
fn apply_rename_rule(rule: &str, field: &str) -> Option<String> {
    let words: Vec<&str> = field.split('_').filter(|w| !w.is_empty()).collect();
    let capitalize = |w: &str| {
        let mut chars = w.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        }
    };

    match rule {
        "snake_case" => Some(field.to_string()),
        "lowercase" => Some(field.replace('_', "").to_lowercase()),
        "PascalCase" => Some(words.iter().map(|w| capitalize(w)).collect()),
        "camelCase" => Some(
            words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_string() } else { capitalize(w) })
                .collect(),
        ),
        _ => None,
    }
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let container = shape_args(&input.attrs)?;
    if container.rename.is_some() || container.skip {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "only `rename_all` is allowed on the container",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Shape can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Shape can only be derived for structs",
            ));
        }
    };

    let mut names = Vec::new();
    let mut accessors = Vec::new();

    for field in fields {
        let args = shape_args(&field.attrs)?;
        if args.rename_all.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                "`rename_all` is only allowed on the container",
            ));
        }
        if args.skip {
            continue;
        }

        let ident = field.ident.as_ref().expect("named field");
        let raw = ident.to_string();
        let raw = raw.strip_prefix("r#").unwrap_or(&raw).to_string();

        let name = match (args.rename, container.rename_all.as_deref()) {
            (Some(rename), _) => rename,
            (None, Some(rule)) => apply_rename_rule(rule, &raw).ok_or_else(|| {
                syn::Error::new_spanned(
                    &input.ident,
                    format!("unsupported rename_all rule `{}`", rule),
                )
            })?,
            (None, None) => raw,
        };

        if names.iter().any(|n: &String| n.eq_ignore_ascii_case(&name)) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate shape field `{}`", name),
            ));
        }

        let index = names.len();
        names.push(name);
        accessors.push(quote! { #index => ::serde_json::to_value(&self.#ident), });
    }

    let ty = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics crate::query::Shape for #ty #ty_generics #where_clause {
            const FIELDS: &'static [&'static str] = &[#(#names),*];

            fn field_value(&self, index: usize) -> ::serde_json::Result<::serde_json::Value> {
                match index {
                    #(#accessors)*
                    _ => Ok(::serde_json::Value::Null),
                }
            }
        }
    })
}

/// Derives `crate::query::Shape`, the compile-time field table used for
/// field shaping. Field names follow `#[shape(rename_all = "...")]` on the
/// container and `#[shape(rename = "...")]` on fields; `#[shape(skip)]`
/// leaves a field out of the table.
#[proc_macro_derive(Shape, attributes(shape))]
pub fn derive_shape(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
