pub mod permission_request;
pub mod post_tool_use;
pub mod pre_tool_use;
pub mod stop;
pub mod subagent_stop;
pub mod user_prompt_submit;
