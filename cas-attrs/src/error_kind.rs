use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    Attribute,
    Expr,
    Fields,
    Ident,
    ItemStruct,
    Result,
    Token,
};

/// A single `tag = expr` argument of the `error` attribute.
struct ReportArg {
    tag: Ident,
    value: Expr,
}

impl Parse for ReportArg {
    fn parse(input: ParseStream) -> Result<Self> {
        let tag = input.parse()?;
        input.parse::<Token![=]>()?;
        let value = input.parse()?;
        Ok(Self { tag, value })
    }
}

/// The arguments that can be passed to the `error` attribute.
#[derive(Default)]
pub struct ReportArgs {
    pub message: Option<Expr>,
    pub labels: Option<Expr>,
    pub help: Option<Expr>,
}

impl Parse for ReportArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = ReportArgs::default();
        let list = Punctuated::<ReportArg, Token![,]>::parse_terminated(input)?;

        for ReportArg { tag, value } in list {
            let slot = match tag.to_string().as_str() {
                "message" => &mut args.message,
                "labels" => &mut args.labels,
                "help" => &mut args.help,
                other => return Err(syn::Error::new_spanned(&tag, format!("unknown tag `{}`", other))),
            };

            if slot.replace(value).is_some() {
                return Err(syn::Error::new_spanned(&tag, format!("duplicate tag `{}`", tag)));
            }
        }

        Ok(args)
    }
}

/// Creates a `let` statement that destructures `self` into its named fields, so that the
/// attribute expressions can refer to the fields by name. Returns a compile error for tuple
/// structs.
fn destructure_fields(ident: &Ident, fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(fields) => {
            let fields = fields.named.iter().map(|field| field.ident.as_ref());
            quote! {
                #[allow(unused_variables)]
                let Self { #(#fields),* } = self;
            }
        },
        Fields::Unnamed(_) => quote_spanned! { ident.span() => compile_error!("`ErrorKind` cannot be derived for tuple structs"); },
        Fields::Unit => quote! {},
    }
}

/// The struct to derive `ErrorKind` for.
pub struct ErrorKindTarget {
    pub name: Ident,
    pub fields: Fields,
    pub args: ReportArgs,
}

impl Parse for ErrorKindTarget {
    fn parse(input: ParseStream) -> Result<Self> {
        // outer attributes include the documentation and the `error` attribute
        let attributes = input.call(Attribute::parse_outer)?;
        let item = input.parse::<ItemStruct>()?;

        let mut args = None;
        for attr in &attributes {
            if attr.path().is_ident("error") {
                args = Some(attr.parse_args::<ReportArgs>()?);
                break;
            }
        }

        let args = args.ok_or_else(|| syn::Error::new_spanned(
            &item.ident,
            "missing `#[error(message = ...)]` attribute",
        ))?;
        if args.message.is_none() {
            return Err(syn::Error::new_spanned(&item.ident, "the `error` attribute requires a `message` tag"));
        }

        Ok(ErrorKindTarget {
            name: item.ident,
            fields: item.fields,
            args,
        })
    }
}

impl ToTokens for ErrorKindTarget {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        let name = &self.name;
        let destructure = destructure_fields(name, &self.fields);
        let message = self.args.message.as_ref();
        let labels = self.args.labels.as_ref()
            .map(|labels| quote! { #labels })
            .unwrap_or_else(|| quote! { ::std::vec::Vec::<::std::string::String>::new() });
        let help = self.args.help.as_ref()
            .map(|help| quote! { builder.set_help(#help); });

        tokens.extend(quote! {
            impl ::cas_error::ErrorKind for #name {
                fn message(&self) -> ::std::string::String {
                    #destructure
                    ::std::string::ToString::to_string(&#message)
                }

                fn build_report<'a>(
                    &self,
                    src_id: &'a str,
                    spans: &[::std::ops::Range<usize>],
                ) -> ::cas_error::ariadne::Report<(&'a str, ::std::ops::Range<usize>)> {
                    #destructure

                    let offset = spans.first().map_or(0, |span| span.start);
                    let mut builder = ::cas_error::ariadne::Report::build(
                        ::cas_error::ariadne::ReportKind::Error,
                        src_id,
                        offset,
                    )
                        .with_message(#message)
                        .with_labels(
                            #labels
                                .into_iter()
                                .zip(spans.iter())
                                .map(|(label_str, span)| {
                                    let label_str = ::std::string::ToString::to_string(&label_str);
                                    let label = ::cas_error::ariadne::Label::new((src_id, span.clone()))
                                        .with_color(::cas_error::EXPR);

                                    if label_str.is_empty() {
                                        label
                                    } else {
                                        label.with_message(label_str)
                                    }
                                })
                                .collect::<::std::vec::Vec<_>>()
                        );

                    #help
                    builder.finish()
                }
            }
        });
    }
}
