// crates/sedml-rs/src/elements/mod.rs

//! Concrete SED-ML element kinds.
//!
//! Each kind is a plain struct owning its attribute values and child lists.
//! Kinds that share an abstract base (simulations, tasks, ranges, changes,
//! outputs) are gathered into closed enums so they can share a list.

pub mod data_generator;
pub mod model;
pub mod output;
pub mod range;
pub mod simulation;
pub mod task;

pub use data_generator::{DataGenerator, Parameter, Variable};
pub use model::{Change, ChangeAttribute, Model, RemoveXml};
pub use output::{Curve, DataSet, Output, Plot2D, Plot3D, Report, Surface, SurfaceType};
pub use range::{FunctionalRange, Range, UniformRange, VectorRange};
pub use simulation::{Algorithm, AlgorithmParameter, OneStep, Simulation, SteadyState, UniformTimeCourse};
pub use task::{AbstractTask, RepeatedTask, SetValue, SubTask, Task};

use crate::error::SedmlError;
use crate::xml::{XmlInput, XmlSink, XmlToken};

/// Declares a closed enum over sibling kinds and makes it a list item.
macro_rules! sibling_kinds {
    (
        $(#[$meta:meta])*
        $name:ident: $abstract:expr => {
            $($variant:ident($ty:ty) => $info:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $($variant($ty)),+
        }

        impl $crate::list_of::ListItem for $name {
            fn node(&self) -> &dyn $crate::base::SedBase {
                match self {
                    $($name::$variant(inner) => inner),+
                }
            }

            fn node_mut(&mut self) -> &mut dyn $crate::base::SedBase {
                match self {
                    $($name::$variant(inner) => inner),+
                }
            }

            fn create(name: &str, namespaces: &$crate::types::SedNamespaces) -> Option<Self> {
                $(
                    if name == $info.element_name() {
                        return Some($name::$variant(<$ty>::new(namespaces)));
                    }
                )+
                None
            }

            fn item_type() -> $crate::types::TypeCode {
                $abstract
            }
        }

        $(
            impl From<$ty> for $name {
                fn from(inner: $ty) -> Self {
                    $name::$variant(inner)
                }
            }
        )+
    };
}
pub(crate) use sibling_kinds;

/// Consumes a `<math>` element into `math`, if that is the next element.
pub(crate) fn read_math(input: &mut dyn XmlInput, math: &mut Option<String>) -> bool {
    if !matches!(input.peek(), XmlToken::Start(tag) if tag.name == "math") {
        return false;
    }
    *math = input.read_raw_element();
    true
}

pub(crate) fn write_math(math: &Option<String>, sink: &mut dyn XmlSink) -> Result<(), SedmlError> {
    match math {
        Some(math) => sink.write_raw(math),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_of::ListItem;
    use crate::types::{SedNamespaces, TypeCode};

    fn created<T: ListItem>(name: &str) -> Option<(TypeCode, String)> {
        let item = T::create(name, &SedNamespaces::default())?;
        Some((item.node().type_code(), item.node().element_name().to_string()))
    }

    #[test]
    fn test_sibling_kinds_dispatch_on_their_element_names() {
        let cases = [
            (created::<Change>("changeAttribute"), TypeCode::ChangeAttribute),
            (created::<Change>("removeXML"), TypeCode::RemoveXml),
            (created::<Simulation>("uniformTimeCourse"), TypeCode::UniformTimeCourse),
            (created::<Simulation>("oneStep"), TypeCode::OneStep),
            (created::<Simulation>("steadyState"), TypeCode::SteadyState),
            (created::<AbstractTask>("task"), TypeCode::Task),
            (created::<AbstractTask>("repeatedTask"), TypeCode::RepeatedTask),
            (created::<Range>("uniformRange"), TypeCode::UniformRange),
            (created::<Range>("vectorRange"), TypeCode::VectorRange),
            (created::<Range>("functionalRange"), TypeCode::FunctionalRange),
            (created::<Output>("report"), TypeCode::Report),
            (created::<Output>("plot2D"), TypeCode::Plot2D),
            (created::<Output>("plot3D"), TypeCode::Plot3D),
        ];
        for (item, code) in cases {
            let (type_code, element) = item.unwrap_or_else(|| panic!("no kind for {:?}", code));
            assert_eq!(type_code, code);
            assert_eq!(element, code.element_name());
        }

        assert!(created::<Simulation>("simulation").is_none());
        assert!(created::<Output>("plot2d").is_none());
        assert!(created::<Model>("model").is_some());
    }
}
