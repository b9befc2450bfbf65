mod link_delete;
mod link_list;
mod serve;
