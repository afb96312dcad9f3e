use maud::{DOCTYPE, Markup, html};

use crate::{
    models::{AddForm, EditForm, FieldError, Movie, RankedMovie},
    tmdb::SearchResult,
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";
const BUTTON_CLASS: &str =
    "w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700";

pub fn index_page(movies: &[RankedMovie], notice: Option<&str>) -> String {
    page(
        "My Top Movies",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-12" {
                    div class="flex items-start justify-between gap-6" {
                        div {
                            h1 class="text-3xl font-bold text-gray-900" { "My Top Movies" }
                            p class="mt-2 text-gray-600" { "Everything I've watched, best first." }
                        }
                        a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/add" { "Add Movie" }
                    }

                    @if let Some(notice) = notice {
                        div class="mt-6 rounded-md bg-green-50 border border-green-200 px-4 py-3 text-green-800" { (notice) }
                    }

                    @if movies.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "No movies yet. Add one to start your list." }
                        }
                    } @else {
                        div class="mt-10 space-y-4" {
                            @for ranked in movies {
                                (movie_card(ranked))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn edit_page(movie: &Movie, form: &EditForm, error: Option<&FieldError>) -> String {
    let rating_error = error.filter(|e| e.field == "rating");

    page(
        &format!("Rate {}", movie.title),
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" { (movie.title) }
                        p class="mt-2 text-gray-600" { "Edit your rating and review." }

                        form class="mt-8 space-y-6" method="post" action=(format!("/edit/{}", movie.id)) {
                            div {
                                label class="block text-sm font-medium text-gray-700" for="rating" { "Your rating out of 10, e.g. 7.5" }
                                input class=(INPUT_CLASS) name="rating" id="rating" value=(form.rating) inputmode="decimal" required;
                                @if let Some(err) = rating_error {
                                    p class="mt-2 text-sm text-red-600" { (err.message) }
                                }
                            }

                            div {
                                label class="block text-sm font-medium text-gray-700" for="review" { "Your review" }
                                input class=(INPUT_CLASS) name="review" id="review" value=(form.review) maxlength="250";
                            }

                            button class=(BUTTON_CLASS) type="submit" { "Done" }
                        }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

pub fn add_page(form: &AddForm, error: Option<&FieldError>) -> String {
    page(
        "Add Movie",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" { "Add a Movie" }

                        form class="mt-8 space-y-6" method="post" action="/add" {
                            div {
                                label class="block text-sm font-medium text-gray-700" for="title" { "Movie title" }
                                input class=(INPUT_CLASS) name="title" id="title" value=(form.title) required;
                                p class="mt-2 text-xs text-gray-500" { "Enter the title of the movie, e.g. The Matrix" }
                                @if let Some(err) = error {
                                    p class="mt-2 text-sm text-red-600" { (err.message) }
                                }
                            }

                            button class=(BUTTON_CLASS) type="submit" { "Add Movie" }
                        }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

pub fn select_page(query: &str, results: &[SearchResult], image_base_url: &str) -> String {
    page(
        "Select Movie",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" { "Select Movie" }
                        p class="mt-2 text-gray-600" { "Results for \"" (query) "\"" }

                        @if results.is_empty() {
                            p class="mt-6 text-gray-600" { "No matches. Try a different title." }
                        } @else {
                            ul class="mt-6 divide-y divide-gray-200" {
                                @for result in results {
                                    li class="py-3 flex gap-4" {
                                        @if let Some(poster) = result.poster_url(image_base_url) {
                                            img class="w-12 h-16 shrink-0 rounded object-cover" src=(poster) alt=(result.title);
                                        }
                                        div {
                                            a class="text-blue-600 hover:text-blue-800" href=(format!("/save/{}", result.id)) {
                                                (result.title)
                                                @if let Some(date) = result.release_date.as_deref().filter(|d| !d.is_empty()) {
                                                    span class="ml-2 text-gray-500" { "(" (date) ")" }
                                                }
                                            }
                                            @if !result.overview.is_empty() {
                                                p class="mt-1 text-sm text-gray-600 line-clamp-2" { (result.overview) }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/add" { "Search again" }
                    }
                }
            }
        },
    )
}

pub fn error_page(message: &str) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn movie_card(ranked: &RankedMovie) -> Markup {
    let movie = &ranked.movie;

    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-6" {
            @if movie.poster_url.is_empty() {
                div class="w-24 h-36 shrink-0 rounded bg-gray-200" {}
            } @else {
                img class="w-24 h-36 shrink-0 rounded object-cover" src=(movie.poster_url) alt=(movie.title);
            }
            div class="flex-1" {
                div class="flex items-start justify-between gap-4" {
                    h2 class="text-xl font-semibold text-gray-900" {
                        span class="mr-2 text-gray-400" { "#" (ranked.rank) }
                        (movie.title)
                        span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                    }
                    span class="text-lg font-semibold text-gray-900" {
                        @match movie.rating {
                            Some(rating) => { (rating) "/10" },
                            None => span class="text-sm font-normal text-gray-400" { "unrated" },
                        }
                    }
                }
                @if let Some(review) = &movie.review {
                    p class="mt-2 italic text-gray-700" { "\u{201c}" (review) "\u{201d}" }
                }
                p class="mt-2 text-sm text-gray-600" { (movie.description) }
                div class="mt-4 flex gap-4 text-sm" {
                    a class="text-blue-600 hover:text-blue-800" href=(format!("/edit/{}", movie.id)) { "Update" }
                    a class="text-red-600 hover:text-red-800" href=(format!("/{}", movie.id)) { "Delete" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_text_is_escaped() {
        let form = AddForm { title: "<script>alert(1)</script>".to_string() };
        let html = add_page(&form, None);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn select_page_links_each_candidate_to_save() {
        let results = vec![SearchResult {
            id: 603,
            title: "The Matrix".to_string(),
            overview: "A hacker learns the truth.".to_string(),
            poster_path: Some("/matrix.jpg".to_string()),
            release_date: Some("1999-03-31".to_string()),
        }];
        let html = select_page("matrix", &results, "https://img/w500");
        assert!(html.contains("href=\"/save/603\""));
        assert!(html.contains("1999-03-31"));
        assert!(html.contains("https://img/w500/matrix.jpg"));
        assert!(html.contains("A hacker learns the truth."));

        assert!(select_page("zzz", &[], "https://img/w500").contains("No matches"));
    }
}
