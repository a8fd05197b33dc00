use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

pub fn derive_stored(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    // Extract #[stored(store = "...")] from struct-level attributes
    let store = extract_store(&input);

    // Extract the field marked with #[stored(id)] or default to "id"
    let id_field = extract_id_field(&input);

    let expanded = quote! {
        impl reelstore::Stored for #name {
            const STORE: &'static str = #store;

            fn id(&self) -> reelstore::EntityId {
                self.#id_field
            }

            fn assign_id(&mut self, id: reelstore::EntityId) {
                self.#id_field = id;
            }
        }
    };

    TokenStream::from(expanded)
}

fn extract_store(input: &DeriveInput) -> String {
    for attr in &input.attrs {
        if !attr.path().is_ident("stored") {
            continue;
        }

        let mut store = None;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("store") {
                let value: LitStr = meta.value()?.parse()?;
                store = Some(value.value());
            }
            Ok(())
        });

        if let Some(s) = store {
            return s;
        }
    }

    // Default: snake_case struct name + "s"
    let name = input.ident.to_string();
    format!("{}s", to_snake_case(&name))
}

fn extract_id_field(input: &DeriveInput) -> syn::Ident {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            for field in &fields.named {
                for attr in &field.attrs {
                    if attr.path().is_ident("stored") {
                        let mut is_id = false;
                        let _ = attr.parse_nested_meta(|meta| {
                            if meta.path.is_ident("id") {
                                is_id = true;
                            }
                            Ok(())
                        });
                        if is_id {
                            return field.ident.clone().unwrap();
                        }
                    }
                }
            }

            // Default: look for a field named "id"
            for field in &fields.named {
                if let Some(ident) = &field.ident {
                    if ident == "id" {
                        return ident.clone();
                    }
                }
            }
        }
    }

    panic!("Stored derive: no field marked with #[stored(id)] and no field named `id`");
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(ch.to_lowercase().next().unwrap());
        } else {
            result.push(ch);
        }
    }
    result
}
