//! v2 blog post endpoints - paging, title search, comments and conflict
//! reporting over the same repository as v1.

mod comments;
mod paging;
mod posts;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v2/blogposts")
            .service(
                web::resource("")
                    .route(web::get().to(posts::list))
                    .route(web::post().to(posts::create)),
            )
            .service(web::resource("/withtitle/{title}").route(web::get().to(posts::with_title)))
            .service(
                web::resource("/{id}")
                    .name("v2_blog_post")
                    .route(web::get().to(posts::get))
                    .route(web::put().to(posts::replace))
                    .route(web::delete().to(posts::delete)),
            )
            .service(
                web::resource("/{id}/comments")
                    .name("v2_blog_post_comments")
                    .route(web::get().to(comments::list))
                    .route(web::post().to(comments::create)),
            )
            .service(
                web::resource("/{id}/comments/{comment_id}")
                    .name("v2_blog_post_comment")
                    .route(web::get().to(comments::get))
                    .route(web::delete().to(comments::delete)),
            ),
    );
}
