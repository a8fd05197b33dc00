mod stored;

use proc_macro::TokenStream;

/// Derive macro for the `Stored` trait.
///
/// Implements the keying contract an entity record needs before it can
/// live in an `EntityStore`: a diagnostic store name, an id getter, and
/// an id setter used by the store when it allocates an identifier.
///
/// # Usage
///
/// By default the store name is the snake_cased struct name with an `s`
/// appended, and the identifier field is the one named `id`:
/// ```ignore
/// #[derive(Stored, Clone)]
/// struct User {
///     id: EntityId,
///     email: String,
/// }
/// // => STORE = "users", id read/written through the `id` field
/// ```
///
/// Both can be overridden:
/// ```ignore
/// #[derive(Stored, Clone)]
/// #[stored(store = "catalog")]
/// struct Film {
///     #[stored(id)]
///     film_id: EntityId,
///     title: String,
/// }
/// ```
#[proc_macro_derive(Stored, attributes(stored))]
pub fn derive_stored(input: TokenStream) -> TokenStream {
    stored::derive_stored(input)
}
