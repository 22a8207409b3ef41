//! Property-based tests for the local sorter: every order is a permutation
//! of its input and respects its key.

use proptest::prelude::*;
use travelgo::services::listing_sorter::sort_items;
use travelgo::types::filter::SortOrder;
use travelgo::types::listing::{Destination, ItemId, ListingItem, Package};

fn arb_destination() -> impl Strategy<Value = ListingItem> {
    (1u64..10_000, "[A-Z][a-z]{0,10}", 0u8..=50).prop_map(|(id, name, rating)| {
        ListingItem::Destination(Destination {
            id: ItemId::from(id),
            name,
            country: String::new(),
            continent: String::new(),
            description: None,
            image_url: None,
            rating: f64::from(rating) / 10.0,
            price_category: None,
            coordinates: None,
            activities: None,
        })
    })
}

fn arb_package() -> impl Strategy<Value = ListingItem> {
    (1u64..10_000, "[A-Z][a-z]{0,10}", 0u32..500_000, 1u32..30).prop_map(
        |(id, name, cents, duration)| {
            ListingItem::Package(Package {
                id: ItemId::from(id),
                name,
                description: None,
                image_url: None,
                duration,
                price: f64::from(cents) / 100.0,
                old_price: None,
                discount_price: None,
                is_promoted: false,
                destinations: None,
                included_services: None,
            })
        },
    )
}

fn arb_items() -> impl Strategy<Value = Vec<ListingItem>> {
    prop::collection::vec(prop_oneof![arb_destination(), arb_package()], 0..40)
}

fn arb_order() -> impl Strategy<Value = SortOrder> {
    prop::sample::select(SortOrder::ALL.to_vec())
}

fn ids(items: &[ListingItem]) -> Vec<String> {
    let mut ids: Vec<String> = items.iter().map(|i| i.id().to_string()).collect();
    ids.sort();
    ids
}

proptest! {
    #[test]
    fn sorting_is_a_permutation(items in arb_items(), order in arb_order()) {
        let sorted = sort_items(&items, order);
        prop_assert_eq!(sorted.len(), items.len());
        prop_assert_eq!(ids(&sorted), ids(&items));
    }

    #[test]
    fn sorting_twice_changes_nothing(items in arb_items(), order in arb_order()) {
        let once = sort_items(&items, order);
        prop_assert_eq!(sort_items(&once, order), once);
    }

    #[test]
    fn rating_order_is_descending(items in arb_items()) {
        for order in [SortOrder::Popularity, SortOrder::RatingDesc] {
            let sorted = sort_items(&items, order);
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].rating() >= pair[1].rating());
            }
        }
    }

    #[test]
    fn name_orders_are_monotonic(items in arb_items()) {
        let asc = sort_items(&items, SortOrder::NameAsc);
        for pair in asc.windows(2) {
            prop_assert!(pair[0].name() <= pair[1].name());
        }
        let desc = sort_items(&items, SortOrder::NameDesc);
        for pair in desc.windows(2) {
            prop_assert!(pair[0].name() >= pair[1].name());
        }
    }

    #[test]
    fn price_orders_put_unpriced_items_last(items in arb_items()) {
        for order in [SortOrder::PriceAsc, SortOrder::PriceDesc] {
            let sorted = sort_items(&items, order);
            let priced = sorted.iter().take_while(|i| i.price().is_some()).count();
            prop_assert!(sorted[priced..].iter().all(|i| i.price().is_none()));

            for pair in sorted[..priced].windows(2) {
                let (a, b) = (pair[0].price().unwrap(), pair[1].price().unwrap());
                if order == SortOrder::PriceAsc {
                    prop_assert!(a <= b);
                } else {
                    prop_assert!(a >= b);
                }
            }
        }
    }

    #[test]
    fn duration_order_is_ascending(items in arb_items()) {
        let sorted = sort_items(&items, SortOrder::DurationAsc);
        let timed = sorted.iter().take_while(|i| i.duration().is_some()).count();
        prop_assert!(sorted[timed..].iter().all(|i| i.duration().is_none()));
        for pair in sorted[..timed].windows(2) {
            prop_assert!(pair[0].duration() <= pair[1].duration());
        }
    }
}
