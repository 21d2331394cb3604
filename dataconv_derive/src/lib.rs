use darling::util::Ignored;
use darling::{ast, Error, FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::{format_ident, quote, ToTokens};
use syn::{parse_macro_input, parse_quote, DeriveInput};

#[proc_macro_derive(Pack, attributes(dataconv))]
pub fn derive_pack(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    ContainerReceiver::from_derive_input(&input)
        .and_then(|receiver| receiver.validate())
        .map(|data| data.pack_impl().into_token_stream())
        .unwrap_or_else(|error| error.write_errors())
        .into()
}

#[proc_macro_derive(Unpack, attributes(dataconv))]
pub fn derive_unpack(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    ContainerReceiver::from_derive_input(&input)
        .and_then(|receiver| receiver.validate())
        .map(|data| data.unpack_impl().into_token_stream())
        .unwrap_or_else(|error| error.write_errors())
        .into()
}

#[derive(FromDeriveInput)]
#[darling(attributes(dataconv), supports(struct_any))]
struct ContainerReceiver {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<Ignored, FieldReceiver>,

    format: syn::LitStr,

    #[darling(default)]
    crate_path: Option<syn::Path>,
}

struct ContainerData {
    ident: syn::Ident,
    generics: syn::Generics,
    crate_path: syn::Path,
    format: syn::LitStr,
    style: ast::Style,
    fields: Vec<FieldData>,
}

impl ContainerReceiver {
    fn validate(&self) -> Result<ContainerData, Error> {
        let crate_path = self
            .crate_path
            .clone()
            .unwrap_or_else(|| parse_quote!(dataconv));

        let fields = match &self.data {
            ast::Data::Struct(fields) => fields,
            ast::Data::Enum(..) => {
                return Err(Error::custom("only structs can be packed").with_span(&self.ident))
            }
        };

        if self.format.value().is_empty() && fields.fields.iter().any(|field| !field.skip) {
            return Err(
                Error::custom("an empty format cannot pack any fields").with_span(&self.format)
            );
        }

        Ok(ContainerData {
            ident: self.ident.clone(),
            generics: self.generics.clone(),
            crate_path,
            format: self.format.clone(),
            style: fields.style,
            fields: fields
                .fields
                .iter()
                .enumerate()
                .map(|(index, field)| field.validate(index))
                .collect(),
        })
    }
}

impl ContainerData {
    fn destructure(&self) -> TokenStream {
        let field_pat = self.fields.iter().map(|field| {
            let FieldData {
                stored_ident,
                public_ref_ident,
                ..
            } = field;
            match stored_ident {
                Some(stored_ident) => quote!(#stored_ident: #public_ref_ident),
                None => quote!(#public_ref_ident),
            }
        });
        match self.style {
            ast::Style::Tuple => quote!( Self ( #( #field_pat, )* ) ),
            ast::Style::Struct => quote!( Self { #( #field_pat, )* } ),
            ast::Style::Unit => quote!(Self),
        }
    }

    fn pack_impl(&self) -> TokenStream {
        let Self {
            ident,
            crate_path,
            format,
            ..
        } = self;
        let (impl_generics, ident_generics, where_clause) = self.generics.split_for_impl();

        let pattern = self.destructure();
        let arg = self
            .fields
            .iter()
            .filter(|field| !field.skip)
            .map(|field| {
                let public_ref_ident = &field.public_ref_ident;
                quote!(#crate_path::IntoValue::to_value(#public_ref_ident))
            });

        quote! {
            #[allow(non_shorthand_field_patterns, unused_variables)]
            impl #impl_generics #crate_path::Pack for #ident #ident_generics
                #where_clause
            {
                fn pack(&self) -> Result<Vec<u8>, #crate_path::Error> {
                    match self {
                        #pattern => #crate_path::pack(#format, &[ #( #arg, )* ]),
                    }
                }
            }
        }
    }

    fn unpack_impl(&self) -> TokenStream {
        let Self {
            ident,
            crate_path,
            format,
            ..
        } = self;
        let (impl_generics, ident_generics, where_clause) = self.generics.split_for_impl();
        let values_binding = quote!(__dataconv_values);

        let field_init = self.fields.iter().map(|field| {
            let FieldData {
                private_owned_ident,
                public_ref_ident,
                ..
            } = field;
            let name = public_ref_ident.to_string();
            let value = if field.skip {
                quote!(Default::default())
            } else {
                quote!(#crate_path::export::next_field(&mut #values_binding, #name)?)
            };
            quote!(let #private_owned_ident = #value;)
        });

        let field_cons = self.fields.iter().map(|field| {
            let FieldData {
                stored_ident,
                private_owned_ident,
                ..
            } = field;
            match stored_ident {
                Some(stored_ident) => quote!(#stored_ident: #private_owned_ident),
                None => quote!(#private_owned_ident),
            }
        });
        let construct = match self.style {
            ast::Style::Tuple => quote!( Self ( #( #field_cons, )* ) ),
            ast::Style::Struct => quote!( Self { #( #field_cons, )* } ),
            ast::Style::Unit => quote!(Self),
        };

        quote! {
            impl #impl_generics #crate_path::Unpack for #ident #ident_generics
                #where_clause
            {
                fn unpack(__dataconv_buffer: &[u8], __dataconv_start: usize)
                    -> Result<Self, #crate_path::Error>
                {
                    #[allow(unused_mut, unused_variables)]
                    let mut #values_binding =
                        #crate_path::unpack(#format, __dataconv_buffer, __dataconv_start)?
                            .into_iter();
                    #( #field_init )*
                    Ok(#construct)
                }
            }
        }
    }
}

#[derive(FromField)]
#[darling(attributes(dataconv))]
struct FieldReceiver {
    ident: Option<syn::Ident>,

    #[darling(default)]
    skip: bool,
}

struct FieldData {
    stored_ident: Option<syn::Ident>,
    public_ref_ident: syn::Ident,
    private_owned_ident: syn::Ident,
    skip: bool,
}

impl FieldReceiver {
    fn validate(&self, index: usize) -> FieldData {
        let stored_ident = self.ident.clone();
        let public_ref_ident = match &self.ident {
            Some(ident) => ident.clone(),
            None => format_ident!("field_{}", index),
        };
        let private_owned_ident = format_ident!("__dataconv_owned_{}", public_ref_ident);

        FieldData {
            stored_ident,
            public_ref_ident,
            private_owned_ident,
            skip: self.skip,
        }
    }
}
