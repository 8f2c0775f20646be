//! CSS selector matching engine.
//! Reference: <https://www.w3.org/TR/selectors-3/>

use super::{
    Combinator, ComplexSelector, CompoundSelector, ElementAdapter, SelectorList, SimpleSelector,
};

/// Match a selector list against an element.
/// Selectors Level 3, Section 3, 4
pub fn matches_selector_list<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    list: &SelectorList,
) -> bool {
    list.selectors
        .iter()
        .any(|selector_item| matches_complex(adapter, element, selector_item))
}

/// Match a complex selector against an element.
/// Selectors Level 3, Section 3, 11: Right-to-left matching strategy
pub fn matches_complex<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    sel: &ComplexSelector,
) -> bool {
    let mut compounds: Vec<&CompoundSelector> = Vec::with_capacity(sel.rest.len() + 1);
    compounds.push(&sel.first);
    compounds.extend(sel.rest.iter().map(|pair| &pair.1));
    let combinators: Vec<Combinator> = sel.rest.iter().map(|pair| pair.0).collect();
    match_from(adapter, element, &compounds, &combinators)
}

/// Match `compounds.last()` against `element`, then relate the remaining
/// compounds through `combinators`, backtracking across ancestors/siblings.
fn match_from<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    compounds: &[&CompoundSelector],
    combinators: &[Combinator],
) -> bool {
    let Some((right, left_compounds)) = compounds.split_last() else {
        return true;
    };
    if !matches_compound(adapter, element, right) {
        return false;
    }
    let Some((combinator, left_combinators)) = combinators.split_last() else {
        return left_compounds.is_empty();
    };
    match combinator {
        Combinator::Child => adapter
            .parent(element)
            .is_some_and(|parent| match_from(adapter, parent, left_compounds, left_combinators)),
        Combinator::Descendant => {
            let mut cursor = adapter.parent(element);
            while let Some(ancestor) = cursor {
                if match_from(adapter, ancestor, left_compounds, left_combinators) {
                    return true;
                }
                cursor = adapter.parent(ancestor);
            }
            false
        }
        Combinator::AdjacentSibling => adapter
            .previous_sibling_element(element)
            .is_some_and(|prev| match_from(adapter, prev, left_compounds, left_combinators)),
        Combinator::GeneralSibling => {
            let mut cursor = adapter.previous_sibling_element(element);
            while let Some(prev) = cursor {
                if match_from(adapter, prev, left_compounds, left_combinators) {
                    return true;
                }
                cursor = adapter.previous_sibling_element(prev);
            }
            false
        }
    }
}

/// Match a compound selector against a single element.
/// Selectors Level 3, Section 5–8
pub fn matches_compound<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    compound: &CompoundSelector,
) -> bool {
    compound.simples.iter().all(|simple| match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(type_name) => adapter.tag_name(element) == type_name.as_str(),
        SimpleSelector::Class(class_name) => adapter.has_class(element, class_name),
        SimpleSelector::IdSelector(id_value) => {
            adapter.attr(element, "id") == Some(id_value.as_str())
        }
        SimpleSelector::AttrExists(name) => adapter.attr(element, name).is_some(),
        SimpleSelector::AttrEquals { name, value } => {
            adapter.attr(element, name) == Some(value.as_str())
        }
        SimpleSelector::AttrPrefix { name, value } => {
            !value.is_empty()
                && adapter
                    .attr(element, name)
                    .is_some_and(|actual| actual.starts_with(value.as_str()))
        }
    })
}
