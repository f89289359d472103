mod common;

use chrono::Duration;
use common::{at, link};
use linklit_core::{filter_and_sort, sorted_by_reminder_priority, CompletionFilter, Link};

fn ids(links: &[Link]) -> Vec<&str> {
    links.iter().map(|link| link.id.as_str()).collect()
}

#[test]
fn reminders_first_ascending_then_newest_created() {
    let now = at(2024, 5, 15, 10, 0);
    let mut overdue = link("overdue", now - Duration::days(9));
    overdue.reminder = Some(now - Duration::hours(3));
    let mut soon = link("soon", now - Duration::days(8));
    soon.reminder = Some(now + Duration::hours(1));
    let mut later = link("later", now);
    later.reminder = Some(now + Duration::days(3));
    let old = link("old", now - Duration::days(2));
    let fresh = link("fresh", now - Duration::hours(1));

    let sorted = sorted_by_reminder_priority(&[old, later, fresh, soon, overdue]);

    assert_eq!(ids(&sorted), vec!["overdue", "soon", "later", "fresh", "old"]);
}

#[test]
fn exact_ties_keep_input_order() {
    let now = at(2024, 5, 15, 10, 0);
    let mut first = link("first", now);
    first.reminder = Some(now + Duration::hours(2));
    let mut second = link("second", now - Duration::days(1));
    second.reminder = Some(now + Duration::hours(2));
    let third = link("third", now);
    let fourth = link("fourth", now);

    let sorted = sorted_by_reminder_priority(&[third, first, fourth, second]);

    assert_eq!(ids(&sorted), vec!["first", "second", "third", "fourth"]);
}

#[test]
fn filters_select_by_completion() {
    let now = at(2024, 5, 15, 10, 0);
    let mut done = link("done", now);
    done.is_completed = true;
    let mut reminded_done = link("reminded_done", now - Duration::days(1));
    reminded_done.is_completed = true;
    reminded_done.reminder = Some(now);
    let open = link("open", now - Duration::days(2));
    let all = vec![done, reminded_done, open];

    assert_eq!(
        ids(&filter_and_sort(all.clone(), CompletionFilter::Active)),
        vec!["open"]
    );
    assert_eq!(
        ids(&filter_and_sort(all.clone(), CompletionFilter::Completed)),
        vec!["reminded_done", "done"]
    );
    assert_eq!(filter_and_sort(all, CompletionFilter::All).len(), 3);
}

#[test]
fn sorting_is_a_permutation() {
    let now = at(2024, 5, 15, 10, 0);
    let input: Vec<Link> = (0..12)
        .map(|i| {
            let mut item = link(&format!("l{i}"), now - Duration::hours(i * 7 % 5));
            if i % 3 == 0 {
                item.reminder = Some(now + Duration::minutes(i * 13 % 11));
            }
            item
        })
        .collect();

    let sorted = sorted_by_reminder_priority(&input);

    let mut expected: Vec<&str> = ids(&input);
    let mut actual: Vec<&str> = ids(&sorted);
    expected.sort_unstable();
    actual.sort_unstable();
    assert_eq!(actual, expected);
    assert!(sorted
        .windows(2)
        .all(|pair| !(pair[0].reminder.is_none() && pair[1].reminder.is_some())));
}
