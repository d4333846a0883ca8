/// Define a struct and derive its [`CsvRecord`](crate::CsvRecord) impl.
///
/// Each field may carry one `#[csv("column")]` or
/// `#[csv("column,required")]` attribute, alongside doc comments and any
/// other attributes. Fields without one are still listed, so constructing
/// an iterator for the type fails with a missing-annotation error. The
/// struct must implement `Default`.
///
/// Fields are expanded one attribute at a time, so very wide structs may
/// need a higher `#![recursion_limit]`.
///
/// ```
/// use csvmap::{csv_record, CsvIterator};
///
/// csv_record! {
///     #[derive(Debug, Default)]
///     pub struct Person {
///         /// Full name as written in the file.
///         #[csv("name,required")]
///         pub name: String,
///         #[csv("salary")]
///         pub salary: Option<f64>,
///     }
/// }
///
/// let data = "name,salary\nJane,\n";
/// let mut it: CsvIterator<Person, _> = CsvIterator::from_reader(data.as_bytes()).unwrap();
/// let people = it.to_vec().unwrap();
/// assert_eq!(people[0].salary, None);
/// ```
#[macro_export]
macro_rules! csv_record {
    // ── Entry ──
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($body:tt)*
        }
    ) => {
        $crate::csv_record! {
            @munch [$(#[$meta])* $vis struct $name] $name
            fields [] descs []
            attrs [] tag [::std::option::Option::None]
            $($body)*
        }
    };

    // ── Internal: column annotation ──
    (@munch [$($head:tt)*] $name:ident
        fields [$($fields:tt)*] descs [$($descs:tt)*]
        attrs [$($attrs:tt)*] tag [$($old:tt)*]
        #[csv($tag:literal)] $($rest:tt)*
    ) => {
        $crate::csv_record! {
            @munch [$($head)*] $name
            fields [$($fields)*] descs [$($descs)*]
            attrs [$($attrs)*] tag [::std::option::Option::Some($tag)]
            $($rest)*
        }
    };

    // ── Internal: any other field attribute, kept on the field ──
    (@munch [$($head:tt)*] $name:ident
        fields [$($fields:tt)*] descs [$($descs:tt)*]
        attrs [$($attrs:tt)*] tag [$($tag:tt)*]
        #[$($attr:tt)*] $($rest:tt)*
    ) => {
        $crate::csv_record! {
            @munch [$($head)*] $name
            fields [$($fields)*] descs [$($descs)*]
            attrs [$($attrs)* #[$($attr)*]] tag [$($tag)*]
            $($rest)*
        }
    };

    // ── Internal: field declaration ──
    (@munch [$($head:tt)*] $name:ident
        fields [$($fields:tt)*] descs [$($descs:tt)*]
        attrs [$($attrs:tt)*] tag [$($tag:tt)*]
        $fvis:vis $field:ident : $ty:ty $(, $($rest:tt)*)?
    ) => {
        $crate::csv_record! {
            @munch [$($head)*] $name
            fields [$($fields)* $($attrs)* $fvis $field: $ty,]
            descs [$($descs)*
                $crate::FieldDescriptor::new(
                    ::std::stringify!($field),
                    $($tag)*,
                    |record: &mut $name| &mut record.$field,
                ),
            ]
            attrs [] tag [::std::option::Option::None]
            $($($rest)*)?
        }
    };

    // ── Internal: all fields consumed ──
    (@munch [$($head:tt)*] $name:ident
        fields [$($fields:tt)*] descs [$($descs:tt)*]
        attrs [] tag [$($tag:tt)*]
    ) => {
        $($head)* {
            $($fields)*
        }

        impl $crate::CsvRecord for $name {
            fn fields() -> ::std::vec::Vec<$crate::FieldDescriptor<Self>> {
                ::std::vec![$($descs)*]
            }
        }
    };
}
